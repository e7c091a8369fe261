use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// Position and size of a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Window<T = i32> {
    pub width: T,
    pub height: T,
    pub pos_x: T,
    pub pos_y: T,
}

impl<T: Copy> Window<T> {
    pub fn size(&self) -> (T, T) {
        (self.width, self.height)
    }

    pub fn position(&self) -> (T, T) {
        (self.pos_x, self.pos_y)
    }
}

impl Default for Window<i32> {
    fn default() -> Self {
        Self {
            width: 300,
            height: 200,
            pos_x: 0,
            pos_y: 0,
        }
    }
}

pub type WindowSpec = Window<i32>;

/// One of the four docked areas around the text area of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Top,
    Left,
    Bottom,
    Right,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Top, Region::Left, Region::Bottom, Region::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Top => "top",
            Region::Left => "left",
            Region::Bottom => "bottom",
            Region::Right => "right",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a dockable lives when it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DockPosition {
    Top,
    Left,
    Bottom,
    Right,
    #[default]
    Floating,
}

impl DockPosition {
    pub fn region(&self) -> Option<Region> {
        match self {
            DockPosition::Top => Some(Region::Top),
            DockPosition::Left => Some(Region::Left),
            DockPosition::Bottom => Some(Region::Bottom),
            DockPosition::Right => Some(Region::Right),
            DockPosition::Floating => None,
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, DockPosition::Floating)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DockPosition::Floating => "floating",
            DockPosition::Top => "top",
            DockPosition::Left => "left",
            DockPosition::Bottom => "bottom",
            DockPosition::Right => "right",
        }
    }
}

impl From<Region> for DockPosition {
    fn from(region: Region) -> Self {
        match region {
            Region::Top => DockPosition::Top,
            Region::Left => DockPosition::Left,
            Region::Bottom => DockPosition::Bottom,
            Region::Right => DockPosition::Right,
        }
    }
}

impl std::fmt::Display for DockPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dock position `{0}`")]
pub struct ParsePositionError(pub String);

impl std::str::FromStr for DockPosition {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floating" => Ok(DockPosition::Floating),
            "top" => Ok(DockPosition::Top),
            "left" => Ok(DockPosition::Left),
            "bottom" => Ok(DockPosition::Bottom),
            "right" => Ok(DockPosition::Right),
            other => Err(ParsePositionError(other.to_string())),
        }
    }
}

impl std::str::FromStr for Region {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<DockPosition>()?
            .region()
            .ok_or_else(|| ParsePositionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floating_is_not_a_region() {
        assert_eq!(DockPosition::Floating.region(), None);
        assert!("floating".parse::<Region>().is_err());
        assert_eq!("left".parse::<Region>(), Ok(Region::Left));
    }

    #[test]
    fn positions_parse_back_from_display() {
        for position in [
            DockPosition::Top,
            DockPosition::Left,
            DockPosition::Bottom,
            DockPosition::Right,
            DockPosition::Floating,
        ] {
            assert_eq!(position.to_string().parse::<DockPosition>(), Ok(position));
        }
        assert_eq!(
            "center".parse::<DockPosition>(),
            Err(ParsePositionError("center".to_string()))
        );
    }
}
