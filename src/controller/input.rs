//! Physical control input
//!
//! Translates raw hardware events (button falling edges and rotary-encoder
//! line levels) into player commands. Whether the events come from edge
//! interrupts or a polling thread is the injected backend's business; the
//! decoding here is the same either way. The translation layer only sends
//! commands over the channel, it never touches player state.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::Command;

/// Physical buttons on the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    PlayPause,
    Next,
    Previous,
    EncoderPush,
}

const BUTTON_COUNT: usize = 4;

impl Button {
    fn slot(self) -> usize {
        match self {
            Button::PlayPause => 0,
            Button::Next => 1,
            Button::Previous => 2,
            Button::EncoderPush => 3,
        }
    }
}

/// Raw events delivered by the input backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// Falling edge on a button line (active-low inputs, press = fall).
    ButtonFall(Button),
    /// Encoder line levels, sampled on an edge of line A or by polling.
    EncoderLevels { a: bool, b: bool },
}

/// Source of raw input events (GPIO edge callbacks or a polling thread).
#[allow(async_fn_in_trait)]
pub trait InputBackend: Send {
    /// Next raw event, or None when the backend shuts down.
    async fn next_event(&mut self) -> Option<RawInputEvent>;
}

/// Suppresses re-triggers of a mechanical input inside a minimum window.
pub struct Debouncer {
    interval: Duration,
    last_accepted: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// True when enough time passed since the last accepted trigger; the
    /// accepted trigger starts the next window.
    pub fn accept(&mut self, now: Instant) -> bool {
        let ok = self
            .last_accepted
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if ok {
            self.last_accepted = Some(now);
        }
        ok
    }
}

/// Quadrature decoder over the encoder's two lines.
///
/// Owns the last observed level of line A. On each transition of A the level
/// of B decides the direction: B differing from A's new level is clockwise.
pub struct EncoderDecoder {
    last_a: bool,
}

impl EncoderDecoder {
    pub fn new(initial_a: bool) -> Self {
        Self { last_a: initial_a }
    }

    /// Signed step for one sample: +1 clockwise, -1 counter-clockwise, 0
    /// when line A did not move.
    pub fn step(&mut self, a: bool, b: bool) -> i8 {
        if a == self.last_a {
            return 0;
        }
        self.last_a = a;
        if b != a { 1 } else { -1 }
    }
}

/// Debounces buttons, decodes the encoder, and maps both onto commands.
pub struct ControlInput {
    buttons: [Debouncer; BUTTON_COUNT],
    encoder: EncoderDecoder,
    encoder_debounce: Debouncer,
    volume_step: i16,
}

impl ControlInput {
    pub fn new(debounce: Duration, volume_step: u8, initial_a_level: bool) -> Self {
        Self {
            buttons: std::array::from_fn(|_| Debouncer::new(debounce)),
            encoder: EncoderDecoder::new(initial_a_level),
            encoder_debounce: Debouncer::new(debounce),
            volume_step: i16::from(volume_step),
        }
    }

    /// Translate one raw event into a command, applying debounce windows.
    pub fn translate(&mut self, event: RawInputEvent, now: Instant) -> Option<Command> {
        match event {
            RawInputEvent::ButtonFall(button) => {
                if !self.buttons[button.slot()].accept(now) {
                    return None;
                }
                Some(match button {
                    Button::PlayPause => Command::TogglePlayPause,
                    Button::Next => Command::Next,
                    Button::Previous => Command::Previous,
                    Button::EncoderPush => Command::ResetVolume,
                })
            }
            RawInputEvent::EncoderLevels { a, b } => {
                let step = self.encoder.step(a, b);
                if step == 0 || !self.encoder_debounce.accept(now) {
                    return None;
                }
                Some(Command::AdjustVolume(i16::from(step) * self.volume_step))
            }
        }
    }

    /// Pump the backend until it closes or the player is gone.
    pub async fn run<I: InputBackend>(mut self, mut backend: I, commands: mpsc::Sender<Command>) {
        tracing::info!("Physical input listener started");
        while let Some(event) = backend.next_event().await {
            if let Some(cmd) = self.translate(event, Instant::now()) {
                tracing::debug!(?event, ?cmd, "Input event translated");
                if commands.send(cmd).await.is_err() {
                    break;
                }
            }
        }
        tracing::info!("Physical input listener stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBOUNCE: Duration = Duration::from_millis(200);

    fn control() -> ControlInput {
        ControlInput::new(DEBOUNCE, 2, true)
    }

    #[test]
    fn button_press_maps_to_command() {
        let mut input = control();
        let now = Instant::now();
        assert_eq!(
            input.translate(RawInputEvent::ButtonFall(Button::Next), now),
            Some(Command::Next)
        );
        assert_eq!(
            input.translate(RawInputEvent::ButtonFall(Button::PlayPause), now),
            Some(Command::TogglePlayPause)
        );
        assert_eq!(
            input.translate(RawInputEvent::ButtonFall(Button::EncoderPush), now),
            Some(Command::ResetVolume)
        );
    }

    #[test]
    fn bounce_inside_the_window_is_suppressed() {
        let mut input = control();
        let start = Instant::now();
        assert!(
            input
                .translate(RawInputEvent::ButtonFall(Button::Next), start)
                .is_some()
        );
        assert!(
            input
                .translate(
                    RawInputEvent::ButtonFall(Button::Next),
                    start + Duration::from_millis(50)
                )
                .is_none()
        );
        assert!(
            input
                .translate(
                    RawInputEvent::ButtonFall(Button::Next),
                    start + Duration::from_millis(250)
                )
                .is_some()
        );
    }

    #[test]
    fn debounce_windows_are_per_button() {
        let mut input = control();
        let now = Instant::now();
        assert!(
            input
                .translate(RawInputEvent::ButtonFall(Button::Next), now)
                .is_some()
        );
        // A different button fires immediately
        assert!(
            input
                .translate(RawInputEvent::ButtonFall(Button::Previous), now)
                .is_some()
        );
    }

    #[test]
    fn quadrature_direction_follows_b_level() {
        let mut decoder = EncoderDecoder::new(true);
        // A falls while B stays high: clockwise
        assert_eq!(decoder.step(false, true), 1);
        // no transition on A
        assert_eq!(decoder.step(false, true), 0);
        // A rises while B is high (equal levels): counter-clockwise
        assert_eq!(decoder.step(true, true), -1);
    }

    #[test]
    fn five_clockwise_falls_yield_plus_two_each() {
        let mut input = control();
        let mut now = Instant::now();
        let mut fall_total = 0i16;

        for _ in 0..5 {
            // A falls with B high: one clockwise step worth +2
            match input.translate(RawInputEvent::EncoderLevels { a: false, b: true }, now) {
                Some(Command::AdjustVolume(delta)) => fall_total += delta,
                other => panic!("expected a volume step, got {other:?}"),
            }
            now += DEBOUNCE;
            // return A high between detents
            input.translate(RawInputEvent::EncoderLevels { a: true, b: false }, now);
            now += DEBOUNCE;
        }

        assert_eq!(fall_total, 10);
    }

    #[test]
    fn encoder_steps_inside_the_window_are_suppressed() {
        let mut input = control();
        let now = Instant::now();
        assert!(
            input
                .translate(RawInputEvent::EncoderLevels { a: false, b: true }, now)
                .is_some()
        );
        // contact bounce: A flickers back within the window
        assert!(
            input
                .translate(
                    RawInputEvent::EncoderLevels { a: true, b: true },
                    now + Duration::from_millis(1)
                )
                .is_none()
        );
    }
}
