//! Sensor State updaters
//!
//! Each handler overwrites the channel's current fields and appends a
//! snapshot to its bounded history. Missing fields take their defaults:
//! steps 0, booleans false (is_home true), distance 0.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use crate::types::{
    ActivitySnapshot, ActivityStatus, FallAlert, FallEvent, LightEvent, LightSnapshot,
    LocationEvent, LocationSnapshot, MotionEvent, SensorEvent, SensorState,
};

impl SensorState {
    /// Create state with every channel at its defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch an event to its channel
    pub fn apply(&mut self, event: &SensorEvent) {
        match event {
            SensorEvent::Motion(ev) => self.update_motion(ev),
            SensorEvent::Fall(ev) => self.update_fall_alert(ev),
            SensorEvent::Location(ev) => self.update_location(ev),
            SensorEvent::Light(ev) => self.update_light(ev),
        }
    }

    /// Motion update
    pub fn update_motion(&mut self, event: &MotionEvent) {
        let motion = &mut self.motion;
        let steps = event.steps.unwrap_or(0);

        motion.current_activity = if event.is_active.unwrap_or(false) {
            ActivityStatus::Active
        } else {
            ActivityStatus::Sedentary
        };
        motion.steps_today = steps;
        motion.last_movement = event.last_movement;

        motion.activity_history.push(ActivitySnapshot {
            timestamp: event.timestamp,
            is_active: event.is_active,
            movement_count: event.movement_count,
            steps,
        });

        info!(
            activity = %motion.current_activity,
            steps,
            movements = ?event.movement_count,
            "Motion update"
        );
    }

    /// Fall alert
    pub fn update_fall_alert(&mut self, event: &FallEvent) {
        let time = event
            .timestamp
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
            .to_rfc3339();

        self.motion.fall_alerts.push(FallAlert {
            timestamp: event.timestamp,
            magnitude: event.magnitude,
            time: time.clone(),
        });

        warn!(
            magnitude = ?event.magnitude,
            time = %time,
            total = self.motion.fall_alerts.len(),
            "FALL ALERT DETECTED - caregiver notification triggered"
        );
    }

    /// Location update
    pub fn update_location(&mut self, event: &LocationEvent) {
        let location = &mut self.location;
        let distance = event.distance.unwrap_or(0.0);

        location.is_home = event.is_home.unwrap_or(true);
        location.left_home_today = event.left_home_today.unwrap_or(false);
        location.last_update = event.timestamp;

        location.history.push(LocationSnapshot {
            timestamp: event.timestamp,
            is_home: event.is_home,
            distance_from_home: distance,
        });

        let status = if event.is_home.unwrap_or(false) { "at home" } else { "away from home" };
        info!(
            status,
            distance,
            left_home_today = location.left_home_today,
            "Location update"
        );
    }

    /// Ambient light update
    pub fn update_light(&mut self, event: &LightEvent) {
        let light = &mut self.light;

        light.current_level = event.current_level;
        light.is_dark = event.is_dark.unwrap_or(false);
        light.dark_duration_minutes = event.dark_duration.unwrap_or(0.0);
        light.last_update = event.timestamp;

        light.history.push(LightSnapshot {
            timestamp: event.timestamp,
            level: event.current_level,
            is_dark: event.is_dark,
        });

        info!(
            lux = ?event.current_level,
            dark = light.is_dark,
            dark_minutes = light.dark_duration_minutes,
            "Light update"
        );
    }

    /// Share of active snapshots among the last `n`, as a percentage
    pub fn activity_percentage(&self, n: usize) -> f64 {
        let recent = self.motion.activity_history.tail(n);
        if recent.is_empty() {
            return 0.0;
        }
        let active = recent.iter().filter(|a| a.is_active.unwrap_or(false)).count();
        active as f64 / recent.len() as f64 * 100.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
