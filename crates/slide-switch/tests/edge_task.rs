//! The deferred edge task on a tokio runtime.

#![allow(clippy::unwrap_used)]

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use platform::devicetree::{PropValue, Property, StaticNode};
use platform::mocks::{Journal, MockInputRegistry, MockLine, MockLineProvider, MockWake};
use platform::{ChannelRegistry, InputRecord, KeyEvent, LineId};
use slide_switch::config::PROP_GPIOS;
use slide_switch::{SlideSwitch, SlideSwitchDriver, SwitchState, KEY_SLIDE_OFF, KEY_SLIDE_ON};

const LINE: LineId = LineId::new(5);

const PROPS: [Property<'static>; 1] = [Property {
    name: PROP_GPIOS,
    value: PropValue::Gpio(&[5]),
}];

fn node() -> StaticNode<'static> {
    StaticNode {
        compatible: &["slide_button"],
        properties: &PROPS,
    }
}

fn driver(line: &MockLine) -> SlideSwitchDriver<MockLineProvider, MockInputRegistry, MockWake> {
    let journal = Journal::new();
    let lines = MockLineProvider::new(journal.clone());
    lines.add_line(LINE, line.clone());
    SlideSwitchDriver::new(
        lines,
        MockInputRegistry::new(journal.clone()),
        MockWake::new(journal),
    )
}

fn presses(inputs: &MockInputRegistry) -> Vec<platform::KeyCode> {
    inputs
        .key_events()
        .into_iter()
        .filter(|ev| ev.pressed)
        .map(|ev| ev.code)
        .collect()
}

#[tokio::test]
async fn pending_edges_are_handled_before_stop() {
    let line = MockLine::new(false);
    let mut driver = driver(&line);
    driver.probe(&node()).unwrap();

    // on, bounce back to on, off, on
    for level in [true, true, false, true] {
        assert!(line.queue_edge(level));
    }
    let stop = Signal::<NoopRawMutex, ()>::new();
    stop.signal(());

    let switch = driver.switch_mut().unwrap();
    switch.run(&stop).await;
    assert_eq!(switch.state(), SwitchState::On);

    assert_eq!(
        presses(driver.inputs()),
        [KEY_SLIDE_ON, KEY_SLIDE_OFF, KEY_SLIDE_ON]
    );
    driver.remove();
}

#[tokio::test]
async fn edges_arriving_while_running_are_reported() {
    let line = MockLine::new(false);
    let mut driver = driver(&line);
    driver.probe(&node()).unwrap();
    let stop = Signal::<CriticalSectionRawMutex, ()>::new();

    let switch = driver.switch_mut().unwrap();
    let producer = async {
        tokio::task::yield_now().await;
        assert!(line.queue_edge(true));
        tokio::task::yield_now().await;
        assert!(line.queue_edge(false));
        tokio::task::yield_now().await;
        stop.signal(());
    };
    tokio::join!(switch.run(&stop), producer);

    assert_eq!(presses(driver.inputs()), [KEY_SLIDE_ON, KEY_SLIDE_OFF]);
    driver.remove();
    assert!(!line.queue_edge(true), "edges delivered after remove");
}

#[tokio::test]
async fn read_failure_inside_the_task_is_absorbed() {
    let line = MockLine::new(false);
    let mut driver = driver(&line);
    driver.probe(&node()).unwrap();
    line.fail_reads(true);
    assert!(line.queue_edge(true));
    let stop = Signal::<NoopRawMutex, ()>::new();
    stop.signal(());

    let switch = driver.switch_mut().unwrap();
    switch.run(&stop).await;
    assert_eq!(switch.state(), SwitchState::Off);
    assert!(driver.inputs().records().is_empty());

    // The task keeps working once reads recover.
    line.fail_reads(false);
    assert!(line.queue_edge(true));
    stop.signal(());
    let switch = driver.switch_mut().unwrap();
    switch.run(&stop).await;
    assert_eq!(presses(driver.inputs()), [KEY_SLIDE_ON]);
    driver.remove();
}

#[tokio::test]
async fn channel_sink_delivers_pairs_to_a_consumer() {
    static RECORDS: Channel<CriticalSectionRawMutex, InputRecord, 16> = Channel::new();

    let journal = Journal::new();
    let line = MockLine::new(false);
    let mut lines = MockLineProvider::new(journal.clone());
    lines.add_line(LINE, line.clone());
    let mut inputs = ChannelRegistry::new(&RECORDS);
    let mut power = MockWake::new(journal);

    let mut switch = SlideSwitch::attach(&node(), &mut lines, &mut inputs, &mut power).unwrap();
    assert!(inputs.is_claimed());

    assert!(line.queue_edge(true));
    let stop = Signal::<NoopRawMutex, ()>::new();
    stop.signal(());
    switch.run(&stop).await;

    let mut received = Vec::new();
    while let Ok(record) = RECORDS.try_receive() {
        received.push(record);
    }
    assert_eq!(
        received,
        [
            InputRecord::Key(KeyEvent::press(KEY_SLIDE_ON)),
            InputRecord::Sync,
            InputRecord::Key(KeyEvent::release(KEY_SLIDE_ON)),
            InputRecord::Sync,
        ]
    );
    assert_eq!(switch.sink().dropped(), 0);

    switch.detach(&mut lines, &mut inputs, &mut power);
    assert!(!inputs.is_claimed());
}

#[test]
fn full_channel_drops_the_whole_pair() {
    static RECORDS: Channel<CriticalSectionRawMutex, InputRecord, 6> = Channel::new();

    let journal = Journal::new();
    let line = MockLine::new(true);
    let mut lines = MockLineProvider::new(journal.clone());
    lines.add_line(LINE, line.clone());
    let mut inputs = ChannelRegistry::new(&RECORDS);
    let mut power = MockWake::new(journal);
    let mut switch = SlideSwitch::attach(&node(), &mut lines, &mut inputs, &mut power).unwrap();

    // First pair fits, the second only has room for two of its four records.
    switch.handle_edge();
    line.set_level(false);
    switch.handle_edge();

    let received: Vec<_> = core::iter::from_fn(|| RECORDS.try_receive().ok()).collect();
    assert_eq!(received.len() % 4, 0, "partial pair delivered: {received:?}");
    assert_eq!(
        received,
        [
            InputRecord::Key(KeyEvent::press(KEY_SLIDE_ON)),
            InputRecord::Sync,
            InputRecord::Key(KeyEvent::release(KEY_SLIDE_ON)),
            InputRecord::Sync,
        ]
    );
    assert_eq!(switch.sink().dropped(), 4);

    switch.detach(&mut lines, &mut inputs, &mut power);
}
