use serde::{Deserialize, Serialize};

/// Broad wine style, as exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
    Fortified,
}

impl WineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WineType::Red => "red",
            WineType::White => "white",
            WineType::Rose => "rose",
            WineType::Sparkling => "sparkling",
            WineType::Fortified => "fortified",
        }
    }
}

impl std::str::FromStr for WineType {
    type Err = UnknownWineType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(WineType::Red),
            "white" => Ok(WineType::White),
            "rose" => Ok(WineType::Rose),
            "sparkling" => Ok(WineType::Sparkling),
            "fortified" => Ok(WineType::Fortified),
            other => Err(UnknownWineType(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown wine type: {0}")]
pub struct UnknownWineType(pub String);

/// A wine in the catalog. The catalog itself is maintained elsewhere; the
/// ledger only requires that a wine exists before events reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wine {
    pub id: i64,
    pub name: String,
    pub producer: String,
    pub vintage: Option<i32>,
    pub wine_type: Option<WineType>,
}

/// Payload for registering a wine in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWine {
    pub name: String,
    pub producer: String,
    pub vintage: Option<i32>,
    pub wine_type: Option<WineType>,
}
