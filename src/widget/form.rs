use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormId(pub u64);

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Lead capture: name and email, email syntax checked.
    Info,
    /// Demo request: name, email and optional phone.
    Demo,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Info => "To proceed with your request, we require the following information",
            Self::Demo => "Schedule Your Demo",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Info => "Continue",
            Self::Demo => "Schedule Demo",
        }
    }

    pub fn has_phone(self) -> bool {
        matches!(self, Self::Demo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Demo => "demo",
        }
    }

    pub fn name_placeholder(self) -> &'static str {
        match self {
            Self::Info => "Full Name",
            Self::Demo => "Full Name *",
        }
    }

    pub fn email_placeholder(self) -> &'static str {
        match self {
            Self::Info => "Your business email",
            Self::Demo => "Business Email *",
        }
    }
}

pub const SUBMITTING_LABEL: &str = "Submitting...";
pub const PHONE_PLACEHOLDER: &str = "Phone Number (optional)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields(FormKind),
    InvalidEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(FormKind::Info) => f.write_str("Please fill in both fields."),
            Self::MissingFields(FormKind::Demo) => {
                f.write_str("Please fill in all mandatory fields (Name and Business Email).")
            }
            Self::InvalidEmail => f.write_str("Please enter a valid email address."),
        }
    }
}

/// Trimmed field values that passed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineForm {
    pub id: FormId,
    pub kind: FormKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: FormStatus,
    pub error: Option<String>,
}

impl InlineForm {
    pub fn new(id: FormId, kind: FormKind) -> Self {
        Self {
            id,
            kind,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            status: FormStatus::Idle,
            error: None,
        }
    }

    pub fn controls_enabled(&self) -> bool {
        self.status != FormStatus::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.status == FormStatus::Submitting {
            SUBMITTING_LABEL
        } else {
            self.kind.submit_label()
        }
    }

    /// Syntactic checks only. The demo form deliberately skips the email
    /// shape check that the info form applies.
    pub fn validate(&self) -> Result<Submission, ValidationError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() || email.is_empty() {
            return Err(ValidationError::MissingFields(self.kind));
        }

        if self.kind == FormKind::Info && !(email.contains('@') && email.contains('.')) {
            return Err(ValidationError::InvalidEmail);
        }

        let phone = if self.kind.has_phone() {
            self.phone.trim().to_string()
        } else {
            String::new()
        };

        Ok(Submission {
            name: name.to_string(),
            email: email.to_string(),
            phone,
        })
    }

    pub fn begin_submit(&mut self) {
        self.status = FormStatus::Submitting;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = FormStatus::Error;
        self.error = Some(message.into());
    }
}
