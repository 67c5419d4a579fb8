//! Attach-time errors.
//!
//! Everything that can go wrong while binding a switch surfaces synchronously
//! as a [`SwitchError`]. Runtime failures on the edge path never become
//! errors; see [`crate::reporter::EdgeOutcome::ReadFailed`].

/// Invalid or missing device description data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The node has no switch line property
    MissingLine,
    /// The switch line property holds an invalid (negative) line number
    InvalidLine(i32),
}

/// Resource that could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    /// The input line
    Line,
    /// The interrupt bound to the line
    Irq,
    /// Edge delivery on the interrupt
    EdgeDelivery,
}

impl Resource {
    /// Short name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Irq => "irq",
            Self::EdgeDelivery => "edge delivery",
        }
    }
}

/// Slide switch attach errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchError {
    /// Device description unusable; nothing was acquired
    Configuration(ConfigError),
    /// A resource could not be acquired; earlier steps were rolled back
    ResourceAcquisition(Resource),
    /// The input device could not be registered; the line was released
    Registration,
    /// The node is not a slide switch
    NotCompatible,
    /// The driver already has a bound switch
    AlreadyAttached,
}

impl From<ConfigError> for SwitchError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SwitchError {}

impl core::fmt::Display for SwitchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configuration(ConfigError::MissingLine) => {
                write!(f, "Slide switch has no line configured")
            }
            Self::Configuration(ConfigError::InvalidLine(raw)) => {
                write!(f, "Slide switch line {raw} is not valid")
            }
            Self::ResourceAcquisition(resource) => {
                write!(f, "Failed to acquire slide switch {}", resource.as_str())
            }
            Self::Registration => write!(f, "Failed to register slide switch input device"),
            Self::NotCompatible => write!(f, "Device is not a slide switch"),
            Self::AlreadyAttached => write!(f, "Slide switch already attached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failed_resource() {
        let err = SwitchError::ResourceAcquisition(Resource::Irq);
        assert_eq!(err.to_string(), "Failed to acquire slide switch irq");
    }

    #[test]
    fn display_includes_invalid_line_number() {
        let err = SwitchError::from(ConfigError::InvalidLine(-22));
        assert_eq!(err.to_string(), "Slide switch line -22 is not valid");
    }
}
