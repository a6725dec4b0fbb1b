//! ISR-debounced button driver with short, long, and double press detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with external pull-up. GPIO fires on
//! falling edge; the ISR records the raw timestamp into an atomic, and
//! [`ButtonDriver::tick`] (polled from the I/O task) runs the debounce
//! and gesture state machine.
//!
//! ## Gestures
//!
//! | Gesture      | Condition                              | Command                 |
//! |--------------|----------------------------------------|-------------------------|
//! | Short press  | Release, no second press within 300 ms | `WaterNow`              |
//! | Long press   | Hold >= 5 s                            | `ReservoirRefilled`     |
//! | Double press | Two presses within 300 ms              | `LogSnapshot`           |

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::commands::AppCommand;

const DEBOUNCE_MS: u32 = 50;
const LONG_PRESS_MS: u32 = 5000;
const DOUBLE_PRESS_WINDOW_MS: u32 = 300;

/// Raw ISR timestamp (milliseconds since boot, truncated to u32).
/// Written by the ISR, read by the I/O task.
static BUTTON_ISR_TIMESTAMP: AtomicU32 = AtomicU32::new(0);

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongPress,
    DoublePress,
}

impl ButtonEvent {
    /// The controller command bound to this gesture.
    pub fn command(self) -> AppCommand {
        match self {
            Self::ShortPress => AppCommand::WaterNow,
            Self::LongPress => AppCommand::ReservoirRefilled,
            Self::DoublePress => AppCommand::LogSnapshot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Pressed { since_ms: u32 },
    WaitSecondPress { first_release_ms: u32 },
}

pub struct ButtonDriver {
    gpio: i32,
    state: GestureState,
    last_isr_ms: u32,
}

impl ButtonDriver {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            state: GestureState::Idle,
            last_isr_ms: 0,
        }
    }

    /// GPIO pin this button is attached to.
    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Poll the ISR timestamp and the pin level.
    pub fn tick(&mut self, now_ms: u32) -> Option<ButtonEvent> {
        let isr_ms = BUTTON_ISR_TIMESTAMP.load(Ordering::Acquire);
        self.classify(isr_ms, self.is_pressed_hw(), now_ms)
    }

    /// Gesture state machine.  `isr_ms` is the latest edge timestamp
    /// (0 = none yet), `pressed` the current pin level.
    fn classify(&mut self, isr_ms: u32, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        let new_press = isr_ms != 0 && isr_ms != self.last_isr_ms;
        if new_press {
            self.last_isr_ms = isr_ms;
        }

        match self.state {
            GestureState::Idle => {
                if new_press {
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                None
            }

            GestureState::DebounceWait { since_ms } => {
                if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Pressed { since_ms: now_ms };
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                if now_ms.wrapping_sub(since_ms) >= LONG_PRESS_MS {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::LongPress);
                }
                if !pressed || new_press {
                    self.state = GestureState::WaitSecondPress {
                        first_release_ms: now_ms,
                    };
                }
                None
            }

            GestureState::WaitSecondPress { first_release_ms } => {
                let gap = now_ms.wrapping_sub(first_release_ms);
                if new_press && gap <= DOUBLE_PRESS_WINDOW_MS {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::DoublePress);
                }
                if gap > DOUBLE_PRESS_WINDOW_MS {
                    self.state = GestureState::Idle;
                    return Some(ButtonEvent::ShortPress);
                }
                None
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn is_pressed_hw(&self) -> bool {
        !crate::drivers::hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn is_pressed_hw(&self) -> bool {
        false
    }
}

/// ISR handler: registered on the button GPIO falling edge.
/// Safe to call from interrupt context (lock-free atomic store).
pub fn button_isr_handler(now_ms: u32) {
    BUTTON_ISR_TIMESTAMP.store(now_ms, Ordering::Release);
}
