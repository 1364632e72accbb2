use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Skeleton topology and palette used when drawing keypoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SkeletonStyle {
    /// The dataset's own links and colours.
    #[default]
    Mmpose,
    /// OpenPose 18-point body layout with a synthesised neck.
    Openpose,
}

impl SkeletonStyle {
    pub const ALL: &[SkeletonStyle] = &[SkeletonStyle::Mmpose, SkeletonStyle::Openpose];
}

#[derive(Error, Debug, PartialEq)]
#[error("skeleton style must be 'mmpose' or 'openpose', got '{0}'")]
pub struct SkeletonStyleParseError(pub String);

impl FromStr for SkeletonStyle {
    type Err = SkeletonStyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mmpose" => Ok(SkeletonStyle::Mmpose),
            "openpose" => Ok(SkeletonStyle::Openpose),
            other => Err(SkeletonStyleParseError(other.to_string())),
        }
    }
}

impl fmt::Display for SkeletonStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkeletonStyle::Mmpose => write!(f, "mmpose"),
            SkeletonStyle::Openpose => write!(f, "openpose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_agree() {
        for style in SkeletonStyle::ALL {
            assert_eq!(style.to_string().parse::<SkeletonStyle>(), Ok(*style));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("OpenPose".parse::<SkeletonStyle>().is_err());
    }

    #[test]
    fn test_default_is_mmpose() {
        assert_eq!(SkeletonStyle::default(), SkeletonStyle::Mmpose);
    }
}
