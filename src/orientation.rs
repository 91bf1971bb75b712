//! Device orientation to recognition-engine orientation tag mapping.
//!
//! The recognizer needs to know how the pixel buffer is rotated relative to
//! upright text. The mapping is kept as lookup tables so every row can be
//! checked on its own.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Physical orientation of the device as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
    Unknown,
}

impl DeviceOrientation {
    pub const ALL: [DeviceOrientation; 7] = [
        DeviceOrientation::Portrait,
        DeviceOrientation::PortraitUpsideDown,
        DeviceOrientation::LandscapeLeft,
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::FaceUp,
        DeviceOrientation::FaceDown,
        DeviceOrientation::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceOrientation::Portrait => "portrait",
            DeviceOrientation::PortraitUpsideDown => "portrait-upside-down",
            DeviceOrientation::LandscapeLeft => "landscape-left",
            DeviceOrientation::LandscapeRight => "landscape-right",
            DeviceOrientation::FaceUp => "face-up",
            DeviceOrientation::FaceDown => "face-down",
            DeviceOrientation::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceOrientation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DeviceOrientation::ALL
            .into_iter()
            .find(|orientation| orientation.as_str() == normalized)
            .ok_or_else(|| anyhow::anyhow!("unknown device orientation `{s}`"))
    }
}

/// Which way the capturing camera faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    #[default]
    Rear,
    Front,
}

/// Orientation metadata understood by the recognition engine. Each name reads
/// as "where row zero is, where column zero is".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrientationTag {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    LeftTop,
    RightTop,
    RightBottom,
    LeftBottom,
}

impl OrientationTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationTag::TopLeft => "topLeft",
            OrientationTag::TopRight => "topRight",
            OrientationTag::BottomRight => "bottomRight",
            OrientationTag::BottomLeft => "bottomLeft",
            OrientationTag::LeftTop => "leftTop",
            OrientationTag::RightTop => "rightTop",
            OrientationTag::RightBottom => "rightBottom",
            OrientationTag::LeftBottom => "leftBottom",
        }
    }
}

impl fmt::Display for OrientationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Used for face-up, face-down, unknown and anything not listed in a table.
pub const FALLBACK_TAG: OrientationTag = OrientationTag::LeftTop;

const REAR_TAGS: [(DeviceOrientation, OrientationTag); 4] = [
    (DeviceOrientation::Portrait, OrientationTag::RightTop),
    (DeviceOrientation::LandscapeLeft, OrientationTag::TopLeft),
    (DeviceOrientation::PortraitUpsideDown, OrientationTag::LeftBottom),
    (DeviceOrientation::LandscapeRight, OrientationTag::BottomRight),
];

const FRONT_TAGS: [(DeviceOrientation, OrientationTag); 4] = [
    (DeviceOrientation::Portrait, OrientationTag::LeftTop),
    (DeviceOrientation::LandscapeLeft, OrientationTag::BottomLeft),
    (DeviceOrientation::PortraitUpsideDown, OrientationTag::RightBottom),
    (DeviceOrientation::LandscapeRight, OrientationTag::TopRight),
];

pub fn tag_for(orientation: DeviceOrientation, facing: CameraFacing) -> OrientationTag {
    let table: &[(DeviceOrientation, OrientationTag)] = match facing {
        CameraFacing::Rear => &REAR_TAGS,
        CameraFacing::Front => &FRONT_TAGS,
    };

    table
        .iter()
        .find(|(device, _)| *device == orientation)
        .map(|(_, tag)| *tag)
        .unwrap_or(FALLBACK_TAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rear_camera_table() {
        let tags: Vec<_> = DeviceOrientation::ALL
            .into_iter()
            .map(|orientation| tag_for(orientation, CameraFacing::Rear))
            .collect();

        assert_eq!(
            tags,
            vec![
                OrientationTag::RightTop,
                OrientationTag::LeftBottom,
                OrientationTag::TopLeft,
                OrientationTag::BottomRight,
                OrientationTag::LeftTop,
                OrientationTag::LeftTop,
                OrientationTag::LeftTop,
            ]
        );
    }

    #[test]
    fn front_camera_table() {
        assert_eq!(
            tag_for(DeviceOrientation::Portrait, CameraFacing::Front),
            OrientationTag::LeftTop
        );
        assert_eq!(
            tag_for(DeviceOrientation::LandscapeLeft, CameraFacing::Front),
            OrientationTag::BottomLeft
        );
        assert_eq!(
            tag_for(DeviceOrientation::PortraitUpsideDown, CameraFacing::Front),
            OrientationTag::RightBottom
        );
        assert_eq!(
            tag_for(DeviceOrientation::LandscapeRight, CameraFacing::Front),
            OrientationTag::TopRight
        );
        assert_eq!(
            tag_for(DeviceOrientation::FaceDown, CameraFacing::Front),
            FALLBACK_TAG
        );
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!(
            "landscape_left".parse::<DeviceOrientation>().unwrap(),
            DeviceOrientation::LandscapeLeft
        );
        assert_eq!(
            " Portrait ".parse::<DeviceOrientation>().unwrap(),
            DeviceOrientation::Portrait
        );
        assert!("sideways".parse::<DeviceOrientation>().is_err());
    }
}
