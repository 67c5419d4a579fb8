//! Simulated slide switch
//!
//! Binds a switch to mock collaborators, flips it through a scripted sequence
//! with some contact bounce, and logs the key pairs it reports.
//!
//! Run this with:
//! ```bash
//! RUST_LOG=debug cargo run -p slide-switch --example simulated_slider --features std,tracing
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use platform::devicetree::{PropValue, Property, StaticNode};
use platform::mocks::{Journal, MockInputRegistry, MockLine, MockLineProvider, MockWake};
use platform::{InputRecord, LineId};
use slide_switch::config::{PROP_GPIOS, PROP_WAKEUP};
use slide_switch::{SlideSwitchDriver, KEY_SLIDE_ON};
use tracing_subscriber::EnvFilter;

const SWITCH_LINE: u32 = 17;

const PROPS: [Property<'static>; 2] = [
    Property {
        name: PROP_GPIOS,
        value: PropValue::Gpio(&[17]),
    },
    Property {
        name: PROP_WAKEUP,
        value: PropValue::Flag,
    },
];

/// Levels the line settles at after each edge: on with two bounces, off, on.
const SCRIPT: [bool; 6] = [true, false, true, true, false, true];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let journal = Journal::new();
    let line = MockLine::new(false);
    let lines = MockLineProvider::new(journal.clone());
    lines.add_line(LineId::new(SWITCH_LINE), line.clone());
    let mut driver = SlideSwitchDriver::new(
        lines,
        MockInputRegistry::new(journal.clone()),
        MockWake::new(journal.clone()),
    );

    let node = StaticNode {
        compatible: &["slide_button"],
        properties: &PROPS,
    };
    driver.probe(&node)?;

    let stop = Signal::<CriticalSectionRawMutex, ()>::new();
    let switch = driver.switch_mut().ok_or("switch not bound")?;
    let slider = async {
        for level in SCRIPT {
            tokio::task::yield_now().await;
            if !line.queue_edge(level) {
                tracing::warn!("edge dropped");
            }
        }
        tokio::task::yield_now().await;
        stop.signal(());
    };
    tokio::join!(switch.run(&stop), slider);

    for record in driver.inputs().records() {
        match record {
            InputRecord::Key(ev) => tracing::info!(
                code = ev.code.0,
                pressed = ev.pressed,
                key = if ev.code == KEY_SLIDE_ON { "KEY_SLIDE_ON" } else { "KEY_SLIDE_OFF" },
                "key"
            ),
            InputRecord::Sync => tracing::debug!("sync"),
        }
    }

    driver.remove();
    tracing::info!(calls = journal.ops().len(), "collaborator calls");
    Ok(())
}
