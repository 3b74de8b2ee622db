//! Robot hardware capability surface.
//!
//! The core never talks to a driver directly: everything flows through
//! [`Robot`]. Calls are synchronous and non-failing at the call site —
//! transport faults are an adapter concern. [`SimulatedRobot`] provides a
//! hardware-free implementation with optionally jittered sensor readings so
//! the full stack runs and tests on any machine.

use rand::Rng;

/// Narrow interface over the rover hardware driver.
pub trait Robot {
    /// Attempt the connection handshake. Returns `true` on success.
    fn connect(&mut self) -> bool;

    /// Release the hardware link.
    fn disconnect(&mut self);

    /// Left ambient light sensor, 0–255.
    fn light_left(&mut self) -> i32;

    /// Right ambient light sensor, 0–255.
    fn light_right(&mut self) -> i32;

    /// Body temperature in degrees Celsius.
    fn temperature_c(&mut self) -> f64;

    /// Set the body LED color.
    fn set_led(&mut self, r: u8, g: u8, b: u8);

    /// Start the buzzer at the given frequency in Hz.
    fn tone_on(&mut self, freq: u32);

    /// Silence the buzzer.
    fn tone_off(&mut self);

    /// Set wheel motor speeds, -255..=255 each.
    fn set_motors(&mut self, left: i16, right: i16);
}

// ──────────────────── simulated adapter ────────────────────

/// Hardware-free rover: fixed base readings plus configurable jitter.
///
/// Actuator calls record their latest values so tests can observe exactly
/// what the alarm pipeline commanded.
#[derive(Debug)]
pub struct SimulatedRobot {
    connected: bool,
    base_light: (i32, i32),
    base_temp_c: f64,
    light_jitter: i32,
    led: (u8, u8, u8),
    tone: Option<u32>,
    motors: (i16, i16),
    rng: rand::rngs::ThreadRng,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRobot {
    /// A rover sitting on a desk in a moderately lit room.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connected: false,
            base_light: (140, 150),
            base_temp_c: 22.5,
            light_jitter: 6,
            led: (0, 0, 0),
            tone: None,
            motors: (0, 0),
            rng: rand::rng(),
        }
    }

    /// Fix the light readings (left, right).
    pub fn set_light_levels(&mut self, left: i32, right: i32) {
        self.base_light = (left, right);
    }

    /// Fix the temperature reading.
    pub fn set_temperature_c(&mut self, temp: f64) {
        self.base_temp_c = temp;
    }

    /// Set sensor jitter amplitude. Zero makes readings deterministic.
    pub fn set_jitter(&mut self, jitter: i32) {
        self.light_jitter = jitter;
    }

    /// Latest LED color commanded.
    #[must_use]
    pub fn led(&self) -> (u8, u8, u8) {
        self.led
    }

    /// Currently sounding frequency, if any.
    #[must_use]
    pub fn tone(&self) -> Option<u32> {
        self.tone
    }

    /// Latest motor speeds commanded.
    #[must_use]
    pub fn motors(&self) -> (i16, i16) {
        self.motors
    }

    /// Whether `connect` has succeeded.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn jitter(&mut self) -> i32 {
        if self.light_jitter == 0 {
            return 0;
        }
        self.rng.random_range(-self.light_jitter..=self.light_jitter)
    }
}

impl Robot for SimulatedRobot {
    fn connect(&mut self) -> bool {
        self.connected = true;
        true
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.motors = (0, 0);
        self.tone = None;
    }

    fn light_left(&mut self) -> i32 {
        let jitter = self.jitter();
        (self.base_light.0 + jitter).clamp(0, 255)
    }

    fn light_right(&mut self) -> i32 {
        let jitter = self.jitter();
        (self.base_light.1 + jitter).clamp(0, 255)
    }

    fn temperature_c(&mut self) -> f64 {
        let jitter = f64::from(self.jitter());
        self.base_temp_c + jitter * 0.05
    }

    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        self.led = (r, g, b);
    }

    fn tone_on(&mut self, freq: u32) {
        self.tone = Some(freq);
    }

    fn tone_off(&mut self) {
        self.tone = None;
    }

    fn set_motors(&mut self, left: i16, right: i16) {
        self.motors = (left, right);
    }
}

// ──────────────────── tests ────────────────────
