use rand::Rng;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque per-launch token correlating requests to one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_millis(),
            Err(_) => 0,
        };
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("session_{millis}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
    System,
}

impl Author {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnKind {
    #[default]
    Normal,
    Welcome,
    /// Logical failure text reported by the chat service.
    ServiceError,
    ConnectionError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub author: Author,
    pub text: String,
    pub kind: TurnKind,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Author::User, text, TurnKind::Normal)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Author::Bot, text, TurnKind::Normal)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Author::System, text, TurnKind::Normal)
    }

    pub fn new(author: Author, text: impl Into<String>, kind: TurnKind) -> Self {
        Self {
            author,
            text: text.into(),
            kind,
        }
    }
}
