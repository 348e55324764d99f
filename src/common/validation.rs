// Common validation types and traits

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    /// Converts into a `Result`, keeping the collected errors on failure
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// A budget name is usable when it has at least one non-whitespace character
pub fn is_valid_name(name: Option<&str>) -> bool {
    name.map(|n| !n.trim().is_empty()).unwrap_or(false)
}

/// A budget goal is usable when it is a finite number above zero
pub fn is_valid_goal(goal: Option<f64>) -> bool {
    goal.map(|g| g.is_finite() && g > 0.0).unwrap_or(false)
}
