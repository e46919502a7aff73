use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the six recorded mood grades. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoodGrade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl MoodGrade {
    /// Display order, best grade first.
    pub const ALL: [MoodGrade; 6] = [
        MoodGrade::APlus,
        MoodGrade::A,
        MoodGrade::B,
        MoodGrade::C,
        MoodGrade::D,
        MoodGrade::F,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "F" => Some(Self::F),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::APlus => "Positive core memory",
            Self::A => "Very positive",
            Self::B => "Positive",
            Self::C => "Neutral (or the positive offset the negative)",
            Self::D => "Negative",
            Self::F => "Very negative",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            Self::APlus => Rgb(0x2D, 0x50, 0x16),
            Self::A => Rgb(0x4C, 0xAF, 0x50),
            Self::B => Rgb(0x8B, 0xC3, 0x4A),
            Self::C => Rgb(0xFF, 0xEB, 0x3B),
            Self::D => Rgb(0xFF, 0x98, 0x00),
            Self::F => Rgb(0xE9, 0x1E, 0x63),
        }
    }

    /// Trend score; C is the neutral baseline.
    pub fn score(self) -> i64 {
        match self {
            Self::APlus => 3,
            Self::A => 2,
            Self::B => 1,
            Self::C => 0,
            Self::D => -1,
            Self::F => -2,
        }
    }

    pub fn best() -> Self {
        Self::APlus
    }

    pub fn worst() -> Self {
        Self::F
    }
}

impl fmt::Display for MoodGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MoodGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MoodGrade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown mood grade `{raw}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
