/// Behavioural tuning for a [`crate::Rig`].
///
/// Every field has a default, so a description may carry a partial `"opts"` block.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RigOpts {
    /// Velocity retention per frame while idle. `1.0` keeps all momentum.
    pub friction_idle: f64,
    /// Velocity retention per frame while excited (pointer held).
    pub friction_excited: f64,
    /// Frames between direction flips while idle.
    pub pace_idle: u32,
    /// Frames between direction flips while excited.
    pub pace_excited: u32,
    /// Motion force multiplier while idle.
    pub force_idle: f64,
    /// Motion force multiplier while excited.
    pub force_excited: f64,
    /// Relaxation passes over all constraints per frame.
    pub iterations: u32,
    /// Hit-test radius as a multiple of node radius.
    pub hit_radius_factor: f64,
    /// Per-frame closing rate of a dragged node towards the pointer.
    pub drag_rate: f64,
    /// Per-frame closing rate of every node towards the pointer while another rig is dragged.
    /// `0.0` disables following.
    pub follow_rate: f64,
    /// Horizontal offset (simulation units) added to every node at construction.
    pub anchor_x: f64,
}

impl Default for RigOpts {
    fn default() -> Self {
        Self {
            friction_idle: 1.0,
            friction_excited: 0.99,
            pace_idle: 28,
            pace_excited: 10,
            force_idle: 0.6,
            force_excited: 2.0,
            iterations: 5,
            hit_radius_factor: 3.0,
            drag_rate: 0.5,
            follow_rate: 0.01,
            anchor_x: 0.0,
        }
    }
}

impl RigOpts {
    pub fn with_anchor_x(mut self, anchor_x: f64) -> Self {
        self.anchor_x = anchor_x;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_follow_rate(mut self, follow_rate: f64) -> Self {
        self.follow_rate = follow_rate;
        self
    }

    pub fn with_idle(mut self, friction: f64, pace: u32, force: f64) -> Self {
        self.friction_idle = friction;
        self.pace_idle = pace;
        self.force_idle = force;
        self
    }

    pub fn with_excited(mut self, friction: f64, pace: u32, force: f64) -> Self {
        self.friction_excited = friction;
        self.pace_excited = pace;
        self.force_excited = force;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.pace_idle == 0 || self.pace_excited == 0 {
            return Err("opts pace must be >= 1".to_string());
        }
        let finite = [
            ("friction_idle", self.friction_idle),
            ("friction_excited", self.friction_excited),
            ("force_idle", self.force_idle),
            ("force_excited", self.force_excited),
            ("hit_radius_factor", self.hit_radius_factor),
            ("drag_rate", self.drag_rate),
            ("follow_rate", self.follow_rate),
            ("anchor_x", self.anchor_x),
        ];
        for (name, v) in finite {
            if !v.is_finite() {
                return Err(format!("opts {name} must be finite"));
            }
        }
        Ok(())
    }
}
