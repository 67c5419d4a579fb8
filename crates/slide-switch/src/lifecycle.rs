//! Lifecycle manager: attach, the deferred edge task, and detach.
//!
//! # Attach
//!
//! ```text
//! resolve config ─▶ request line ─▶ register input ─▶ resolve irq ─▶ enable edges ─▶ wake
//!      │                 │                │                 │               │
//!      ▼                 ▼                ▼                 ▼               ▼
//!   (nothing)         (nothing)       free line       unregister,     unregister,
//!                                                      free line       free line
//! ```
//!
//! A failing step undoes only what this attempt already acquired, so a failed
//! attach never leaves a device registered or a line held. Failing to arm the
//! wake source is logged and tolerated.
//!
//! # Edge task
//!
//! [`SlideSwitch::run`] waits for edges on the line and runs the
//! [`TransitionReporter`] for each one. It holds `&mut self` while running, so
//! invocations are single-flight and [`SlideSwitch::detach`], which consumes
//! the switch, cannot start until the task has returned.
//!
//! # Detach
//!
//! Disarm wake, clear the wakeup mark, deregister edge delivery, unregister
//! the input device, free the line.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use platform::devicetree::DeviceNode;
use platform::gpio::{InterruptLine, InterruptMode, IrqNumber, LineId, LineProvider};
use platform::input::{InputRegistry, InputSink};
use platform::power::{WakeControl, WakeSource};

use crate::config::SwitchConfig;
use crate::error::{Resource, SwitchError};
use crate::keymap::{self, SwitchState, LINE_LABEL};
use crate::monitor::LineMonitor;
use crate::reporter::{EdgeOutcome, TransitionReporter};

/// A bound slide switch.
pub struct SlideSwitch<L, S> {
    monitor: LineMonitor<L>,
    sink: S,
    reporter: TransitionReporter,
    line_id: LineId,
    irq: IrqNumber,
    wakeup: bool,
    wake: WakeSource,
    debounce_interval_ms: u32,
}

impl<L, S> SlideSwitch<L, S>
where
    L: InterruptLine,
    S: InputSink,
{
    /// Bind a switch described by `node`.
    pub fn attach<N, P, R, W>(
        node: &N,
        lines: &mut P,
        inputs: &mut R,
        power: &mut W,
    ) -> Result<Self, SwitchError>
    where
        N: DeviceNode + ?Sized,
        P: LineProvider<Line = L>,
        R: InputRegistry<Sink = S>,
        W: WakeControl,
    {
        let config = SwitchConfig::from_node(node)?;

        let mut line = lines.request(config.line, LINE_LABEL).map_err(|_| {
            error!("slide switch: failed to request line {}", config.line.get());
            SwitchError::ResourceAcquisition(Resource::Line)
        })?;

        let registered = keymap::device_info()
            .ok()
            .and_then(|info| inputs.register(&info).ok());
        let Some(sink) = registered else {
            error!("slide switch: failed to register input device");
            lines.free(line);
            return Err(SwitchError::Registration);
        };

        let irq = match lines.to_irq(&line) {
            Ok(irq) => irq,
            Err(_) => {
                error!("slide switch: no irq for line {}", config.line.get());
                inputs.unregister(sink);
                lines.free(line);
                return Err(SwitchError::ResourceAcquisition(Resource::Irq));
            }
        };

        if line.enable_interrupt(InterruptMode::BothEdges).is_err() {
            error!("slide switch: failed to request irq {}", irq.get());
            inputs.unregister(sink);
            lines.free(line);
            return Err(SwitchError::ResourceAcquisition(Resource::EdgeDelivery));
        }

        power.set_wakeup_capable(config.wakeup);
        let wake = if config.wakeup {
            match power.enable_irq_wake(irq) {
                Ok(()) => WakeSource::Irq(irq),
                Err(_) => {
                    warn!("slide switch: irq {} cannot wake the host", irq.get());
                    WakeSource::None
                }
            }
        } else {
            WakeSource::None
        };

        info!(
            "slide switch: attached line {} irq {} wakeup {}",
            config.line.get(),
            irq.get(),
            wake.is_armed()
        );

        Ok(Self {
            monitor: LineMonitor::new(line),
            sink,
            reporter: TransitionReporter::new(),
            line_id: config.line,
            irq,
            wakeup: config.wakeup,
            wake,
            debounce_interval_ms: config.debounce_interval_ms,
        })
    }

    /// Tear the switch down and give every resource back.
    pub fn detach<P, R, W>(self, lines: &mut P, inputs: &mut R, power: &mut W)
    where
        P: LineProvider<Line = L>,
        R: InputRegistry<Sink = S>,
        W: WakeControl,
    {
        let Self {
            monitor,
            sink,
            irq,
            wake,
            line_id,
            ..
        } = self;

        if let WakeSource::Irq(armed) = wake {
            if power.disable_irq_wake(armed).is_err() {
                warn!("slide switch: failed to disarm wake on irq {}", armed.get());
            }
        }
        power.set_wakeup_capable(false);

        let mut line = monitor.into_line();
        if line.disable_interrupt().is_err() {
            warn!("slide switch: failed to release irq {}", irq.get());
        }
        inputs.unregister(sink);
        lines.free(line);

        info!("slide switch: detached line {}", line_id.get());
    }

    /// Run the transition reporter once, as if an edge had fired.
    pub fn handle_edge(&mut self) -> EdgeOutcome {
        self.reporter.on_edge(&mut self.monitor, &mut self.sink)
    }

    /// Deferred edge task.
    ///
    /// Handles edges until `stop` is signalled or the line stops delivering
    /// them. Edges already pending when `stop` fires are handled first.
    pub async fn run<M: RawMutex>(&mut self, stop: &Signal<M, ()>) {
        debug!("slide switch: edge task started on irq {}", self.irq.get());
        loop {
            let event = select(self.monitor.wait_for_edge(), stop.wait()).await;
            match event {
                Either::First(Ok(())) => {
                    self.handle_edge();
                }
                Either::First(Err(_)) => {
                    error!("slide switch: edge wait failed on irq {}", self.irq.get());
                    break;
                }
                Either::Second(()) => break,
            }
        }
        debug!("slide switch: edge task stopped on irq {}", self.irq.get());
    }

    /// Last committed switch position.
    pub fn state(&self) -> SwitchState {
        self.reporter.committed()
    }

    /// Line the switch is bound to.
    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    /// Interrupt bound to the line.
    pub fn irq(&self) -> IrqNumber {
        self.irq
    }

    /// Whether the description marked the switch wake-capable.
    pub fn is_wakeup_capable(&self) -> bool {
        self.wakeup
    }

    /// Armed wake source, if arming succeeded.
    pub fn wake_source(&self) -> WakeSource {
        self.wake
    }

    /// Advisory debounce interval. Edges are never delayed or filtered by it.
    pub fn debounce_interval_ms(&self) -> u32 {
        self.debounce_interval_ms
    }

    /// Input sink the switch reports into.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Switch line.
    pub fn line(&self) -> &L {
        self.monitor.line()
    }
}
