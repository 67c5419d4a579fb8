//! Device description access
//!
//! Drivers read their wiring (lines, flags, timing hints) from a declarative
//! device description. [`DeviceNode`] is the read-only view a driver gets of
//! its own node; [`StaticNode`] is a const-constructible table for boards
//! that compile the description in instead of parsing one at runtime.
//!
//! # Example
//!
//! ```
//! use platform::devicetree::{DeviceNode, PropValue, Property, StaticNode};
//!
//! const NODE: StaticNode<'static> = StaticNode {
//!     compatible: &["slide_button"],
//!     properties: &[
//!         Property { name: "slide-button,gpios", value: PropValue::Gpio(&[42]) },
//!         Property { name: "slide-button,wakeup", value: PropValue::Flag },
//!     ],
//! };
//!
//! assert!(NODE.is_compatible("slide_button"));
//! assert_eq!(NODE.named_gpio("slide-button,gpios", 0), Some(42));
//! assert_eq!(NODE.read_u32("debounce-interval"), None);
//! ```

/// Read-only view of one device description node.
pub trait DeviceNode {
    /// Whether the node lists `compatible` among its compatible strings.
    fn is_compatible(&self, compatible: &str) -> bool;

    /// Boolean property: `true` iff present.
    fn read_bool(&self, prop: &str) -> bool;

    /// 32-bit integer property; `None` if absent or of another type.
    fn read_u32(&self, prop: &str) -> Option<u32>;

    /// Raw line number at `index` of a gpio-list property.
    ///
    /// Negative values are passed through unchanged; validating them is the
    /// caller's job (see [`crate::gpio::LineId::from_raw`]).
    fn named_gpio(&self, prop: &str, index: usize) -> Option<i32>;
}

/// Property value in a [`StaticNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropValue<'a> {
    /// Presence-only flag
    Flag,
    /// 32-bit cell
    U32(u32),
    /// List of raw line numbers
    Gpio(&'a [i32]),
}

/// Named property in a [`StaticNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    /// Property name
    pub name: &'a str,
    /// Property value
    pub value: PropValue<'a>,
}

/// Compiled-in device description node.
#[derive(Debug, Clone, Copy)]
pub struct StaticNode<'a> {
    /// Compatible strings, most specific first
    pub compatible: &'a [&'a str],
    /// Properties, looked up by name (first match wins)
    pub properties: &'a [Property<'a>],
}

impl StaticNode<'_> {
    fn find(&self, prop: &str) -> Option<PropValue<'_>> {
        self.properties
            .iter()
            .find(|p| p.name == prop)
            .map(|p| p.value)
    }
}

impl DeviceNode for StaticNode<'_> {
    fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible.iter().any(|c| *c == compatible)
    }

    fn read_bool(&self, prop: &str) -> bool {
        self.find(prop).is_some()
    }

    fn read_u32(&self, prop: &str) -> Option<u32> {
        match self.find(prop)? {
            PropValue::U32(v) => Some(v),
            PropValue::Flag | PropValue::Gpio(_) => None,
        }
    }

    fn named_gpio(&self, prop: &str, index: usize) -> Option<i32> {
        match self.find(prop)? {
            PropValue::Gpio(lines) => lines.get(index).copied(),
            PropValue::Flag | PropValue::U32(_) => None,
        }
    }
}
