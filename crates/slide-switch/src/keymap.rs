//! Switch positions, their key codes, and the input device identity.

use platform::input::{BusType, InputDeviceInfo, KeyCode, KeyTableFull};

/// Key reported when the switch moves to off.
///
/// 250 and 251 sit in a range no real keyboard key uses, so consumers can
/// tell the switch apart from every other key source.
pub const KEY_SLIDE_OFF: KeyCode = KeyCode(250);

/// Key reported when the switch moves to on.
pub const KEY_SLIDE_ON: KeyCode = KeyCode(251);

/// Input device name.
pub const DEVICE_NAME: &str = "slide_button";

/// Input device physical path.
pub const DEVICE_PHYS: &str = "/dev/input/slider";

/// Consumer label used when requesting the line.
pub const LINE_LABEL: &str = "slide_button-irq";

/// Switch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Line low
    #[default]
    Off,
    /// Line high
    On,
}

impl SwitchState {
    /// Key code reported on a transition into this position.
    pub const fn keycode(self) -> KeyCode {
        match self {
            Self::Off => KEY_SLIDE_OFF,
            Self::On => KEY_SLIDE_ON,
        }
    }

    /// Short name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

impl From<bool> for SwitchState {
    fn from(high: bool) -> Self {
        if high {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Input device description with exactly the two switch keys enabled.
pub fn device_info() -> Result<InputDeviceInfo, KeyTableFull> {
    let mut info = InputDeviceInfo::new(DEVICE_NAME, DEVICE_PHYS, BusType::Host);
    info.enable_key(KEY_SLIDE_OFF)?;
    info.enable_key(KEY_SLIDE_ON)?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn positions_map_to_distinct_keys() {
        assert_eq!(SwitchState::On.keycode(), KEY_SLIDE_ON);
        assert_eq!(SwitchState::Off.keycode(), KEY_SLIDE_OFF);
        assert_ne!(KEY_SLIDE_ON, KEY_SLIDE_OFF);
    }

    #[test]
    fn high_level_is_on() {
        assert_eq!(SwitchState::from(true), SwitchState::On);
        assert_eq!(SwitchState::from(false), SwitchState::Off);
        assert_eq!(SwitchState::default(), SwitchState::Off);
    }

    #[test]
    fn device_exposes_exactly_two_keys() {
        let info = device_info().unwrap();
        assert_eq!(info.keys(), &[KEY_SLIDE_OFF, KEY_SLIDE_ON]);
        assert_eq!(info.name, DEVICE_NAME);
        assert_eq!(info.phys, DEVICE_PHYS);
        assert_eq!(info.bus, BusType::Host);
    }
}
