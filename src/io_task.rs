//! Serial link I/O task: reactor-driven bridge between the transport
//! and the control thread.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` for reactor-driven timers.  Three
//! concurrent futures:
//!
//! 1. **Link**: polls the peer state and reads bytes every 5 ms,
//!    turning them into `Connected` / `Disconnected` / `Data` events
//! 2. **Transmit**: truly async via `TX_CHANNEL.receive().await`
//!    (wakes as soon as the control thread queues a record)
//! 3. **Button**: runs the gesture classifier every 10 ms and queues
//!    the bound command
//!
//! ```text
//!   control thread                      I/O thread
//!  ┌──────────────┐  EVENT_QUEUE   ┌────────────────────────┐
//!  │ ControlLoop  │ ◀───────────── │ link poll · button     │
//!  │              │  TX_CHANNEL    │                        │
//!  │  QueuedLink  │ ─────────────▶ │ transmit ──▶ Transport │
//!  └──────────────┘                └────────────────────────┘
//! ```

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info, warn};

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::LinkPort;
use crate::config::Delimiter;
use crate::drivers::button::ButtonDriver;
use crate::error::LinkError;
use crate::events::{push_to, ControlEvent, EventQueue, EVENT_QUEUE};
use crate::link::bridge::LinkBridge;
use crate::link::framing::{frame_record, MAX_RECORD_LEN};
use crate::link::transport::{write_all, Transport};

const LINK_POLL_MS: u64 = 5;
const BUTTON_POLL_MS: u64 = 10;

/// Outbound records waiting for the transmit future.
pub const TX_QUEUE_DEPTH: usize = 8;

/// A framed record (text plus delimiter).
pub type OutboundRecord = heapless::String<{ MAX_RECORD_LEN + 1 }>;

pub type TxChannel = Channel<CriticalSectionRawMutex, OutboundRecord, TX_QUEUE_DEPTH>;

/// Control thread → I/O thread.
pub static TX_CHANNEL: TxChannel = Channel::new();

/// Mirrors the peer state as last seen by the link poll.
pub static LINK_UP: AtomicBool = AtomicBool::new(false);

// ── Control-thread side ──────────────────────────────────────

/// [`LinkPort`] that hands framed records to the I/O thread.
pub struct QueuedLink<'a> {
    tx: &'a TxChannel,
    link_up: &'a AtomicBool,
    delimiter: Delimiter,
}

impl QueuedLink<'static> {
    /// Link over the global channel.
    pub fn new(delimiter: Delimiter) -> Self {
        Self::with(&TX_CHANNEL, &LINK_UP, delimiter)
    }
}

impl<'a> QueuedLink<'a> {
    pub fn with(tx: &'a TxChannel, link_up: &'a AtomicBool, delimiter: Delimiter) -> Self {
        Self {
            tx,
            link_up,
            delimiter,
        }
    }
}

impl LinkPort for QueuedLink<'_> {
    fn send(&mut self, record: &str) -> Result<(), LinkError> {
        if !self.link_up.load(Ordering::Acquire) {
            return Err(LinkError::NotConnected);
        }
        let framed = frame_record(record, self.delimiter).ok_or(LinkError::RecordTooLong)?;
        self.tx.try_send(framed).map_err(|_| LinkError::QueueFull)
    }
}

// ── I/O-thread side ──────────────────────────────────────────

/// Transport plus the state the link futures share.
pub struct LinkIo<'a, T: Transport> {
    transport: T,
    bridge: LinkBridge,
    queue: &'a EventQueue,
    tx: &'a TxChannel,
    link_up: &'a AtomicBool,
}

impl<'a, T: Transport> LinkIo<'a, T> {
    pub fn new(
        transport: T,
        delimiter: Delimiter,
        queue: &'a EventQueue,
        tx: &'a TxChannel,
        link_up: &'a AtomicBool,
    ) -> Self {
        Self {
            transport,
            bridge: LinkBridge::new(delimiter),
            queue,
            tx,
            link_up,
        }
    }

    /// Sample the peer state, then read whatever bytes are waiting.
    pub fn poll(&mut self) {
        let up = self.transport.peer_connected();
        if !up && self.bridge.is_connected() {
            // Records framed for the old session must not reach a new peer.
            self.tx.clear();
        }
        self.link_up.store(up, Ordering::Release);
        self.bridge.on_link_state(up, self.queue);
        if !self.bridge.is_connected() {
            // Inbound bytes wait in the transport until `Connected` is queued.
            return;
        }

        let mut buf = [0u8; MAX_RECORD_LEN + 1];
        match self.transport.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => self.bridge.on_rx(&buf[..n], self.queue),
            Err(e) => warn!("IO: read failed: {:?}", e),
        }
    }

    /// Write one framed record.  Dropped if the peer has gone.
    pub fn transmit(&mut self, record: &str) {
        if !self.transport.peer_connected() {
            debug!("IO: peer gone, dropping '{}'", record.trim_end());
            return;
        }
        if let Err(e) = write_all(&mut self.transport, record.as_bytes()) {
            warn!("IO: {} for '{}'", e, record.trim_end());
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

type SharedIo<T> = Rc<RefCell<LinkIo<'static, T>>>;

async fn link_loop<T: Transport>(io: SharedIo<T>) {
    loop {
        io.borrow_mut().poll();
        async_io_mini::Timer::after(Duration::from_millis(LINK_POLL_MS)).await;
    }
}

async fn transmit_loop<T: Transport>(io: SharedIo<T>, tx: &'static TxChannel) {
    loop {
        let record = tx.receive().await;
        io.borrow_mut().transmit(&record);
    }
}

async fn button_loop(mut button: ButtonDriver, queue: &'static EventQueue) {
    let clock = Esp32TimeAdapter::new();
    loop {
        if let Some(gesture) = button.tick(clock.uptime_ms()) {
            info!("IO: button {:?}", gesture);
            push_to(queue, ControlEvent::Command(gesture.command()));
        }
        async_io_mini::Timer::after(Duration::from_millis(BUTTON_POLL_MS)).await;
    }
}

fn run_io_loop<T: Transport + 'static>(transport: T, delimiter: Delimiter, button: ButtonDriver) {
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    let io: SharedIo<T> = Rc::new(RefCell::new(LinkIo::new(
        transport,
        delimiter,
        &EVENT_QUEUE,
        &TX_CHANNEL,
        &LINK_UP,
    )));

    executor.spawn(link_loop(io.clone())).detach();
    executor.spawn(transmit_loop(io, &TX_CHANNEL)).detach();
    executor.spawn(button_loop(button, &EVENT_QUEUE)).detach();

    info!("IO task started (delimiter '{}')", delimiter.as_char().escape_default());

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the I/O task pinned to Core 0 (PRO_CPU), leaving Core 1 to
/// the control loop.
pub fn spawn<T: Transport + Send + 'static>(
    transport: T,
    delimiter: Delimiter,
    button: ButtonDriver,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::Pro,
        12,
        16,
        "link-io\0",
        move || run_io_loop(transport, delimiter, button),
    )
}
