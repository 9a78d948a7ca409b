/// Discrete-step progress of one landing attempt.
///
/// Exists only while the vehicle is in the `Landing` state. The step count
/// strictly increases by one per tick; reaching `total_steps` forces the
/// transition to `Landed`. Altitude and speed decay linearly from the
/// values captured at landing start, so a descent begun from cruise reaches
/// exactly zero at the final step.
#[derive(Debug, Clone, Copy)]
pub struct DescentProgress {
    step: u32,
    total_steps: u32,
    initial_altitude: f64,
    initial_speed: f64,
}

impl DescentProgress {
    pub fn new(initial_altitude: f64, initial_speed: f64, total_steps: u32) -> Self {
        Self {
            step: 0,
            total_steps: total_steps.max(1),
            initial_altitude,
            initial_speed,
        }
    }

    /// Advances by one step, saturating at `total_steps`.
    pub fn advance(&mut self) { self.step = (self.step + 1).min(self.total_steps); }

    pub fn step(&self) -> u32 { self.step }

    pub fn is_complete(&self) -> bool { self.step >= self.total_steps }

    /// Steps left until touchdown. At least one while incomplete, so the
    /// position interpolation divisor never hits zero.
    pub fn steps_remaining(&self) -> u32 { self.total_steps - self.step }

    /// Linearly interpolated altitude at the current step.
    pub fn altitude(&self) -> f64 {
        let frac = f64::from(self.step) / f64::from(self.total_steps);
        (self.initial_altitude * (1.0 - frac)).max(0.0)
    }

    /// Linearly interpolated speed at the current step.
    pub fn speed(&self) -> f64 {
        let frac = f64::from(self.step) / f64::from(self.total_steps);
        (self.initial_speed * (1.0 - frac)).max(0.0)
    }
}
