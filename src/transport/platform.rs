use std::fmt;

/// Host platform as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Android,
    Ios,
    Other(String),
}

impl Platform {
    pub fn from_id(id: &str) -> Self {
        match id {
            "android" => Self::Android,
            "ios" => Self::Ios,
            _ => Self::Other(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
