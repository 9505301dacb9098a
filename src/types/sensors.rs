//! Sensor state per channel and the loosely-typed events that update it
//!
//! Events are read field by field from JSON: a missing field, or one with
//! the wrong type, falls back to its documented default. Nothing here fails.

use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::{MAX_FALL_ALERTS, MAX_SENSOR_HISTORY};

// =============================================================================
// BOUNDED HISTORY
// =============================================================================

/// Append-only series that silently drops its oldest entries past `cap`
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    items: VecDeque<T>,
    cap: usize,
}

impl<T: Clone> BoundedHistory<T> {
    /// Create an empty history holding at most `cap` entries
    pub fn new(cap: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(cap.min(MAX_SENSOR_HISTORY)),
            cap,
        }
    }

    /// Append and evict from the front while over capacity
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Last `n` entries, oldest first
    pub fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).cloned().collect()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Coarse activity derived from the last motion update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Unknown,
    Active,
    Sedentary,
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivityStatus::Unknown => "unknown",
            ActivityStatus::Active => "active",
            ActivityStatus::Sedentary => "sedentary",
        };
        write!(f, "{}", name)
    }
}

/// One motion update as retained in the activity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub timestamp: Option<i64>,
    pub is_active: Option<bool>,
    pub movement_count: Option<u64>,
    pub steps: u64,
}

/// A recorded fall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallAlert {
    /// Epoch milliseconds reported by the device
    pub timestamp: Option<i64>,
    /// Acceleration magnitude in m/s²
    pub magnitude: Option<f64>,
    /// ISO-8601 rendering of `timestamp` (receipt time when absent)
    pub time: String,
}

/// One location update as retained in the location history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub timestamp: Option<i64>,
    pub is_home: Option<bool>,
    pub distance_from_home: f64,
}

/// One light update as retained in the light history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightSnapshot {
    pub timestamp: Option<i64>,
    pub level: Option<f64>,
    pub is_dark: Option<bool>,
}

// =============================================================================
// CHANNEL STATE
// =============================================================================

/// Motion channel
#[derive(Debug, Clone)]
pub struct MotionState {
    pub current_activity: ActivityStatus,
    pub steps_today: u64,
    pub last_movement: Option<i64>,
    pub fall_alerts: BoundedHistory<FallAlert>,
    pub activity_history: BoundedHistory<ActivitySnapshot>,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            current_activity: ActivityStatus::Unknown,
            steps_today: 0,
            last_movement: None,
            fall_alerts: BoundedHistory::new(MAX_FALL_ALERTS),
            activity_history: BoundedHistory::new(MAX_SENSOR_HISTORY),
        }
    }
}

/// Location channel
#[derive(Debug, Clone)]
pub struct LocationState {
    pub is_home: bool,
    pub left_home_today: bool,
    pub last_update: Option<i64>,
    pub history: BoundedHistory<LocationSnapshot>,
}

impl Default for LocationState {
    fn default() -> Self {
        Self {
            is_home: true,
            left_home_today: false,
            last_update: None,
            history: BoundedHistory::new(MAX_SENSOR_HISTORY),
        }
    }
}

/// Ambient light channel
#[derive(Debug, Clone)]
pub struct LightState {
    pub current_level: Option<f64>,
    pub is_dark: bool,
    pub dark_duration_minutes: f64,
    pub last_update: Option<i64>,
    pub history: BoundedHistory<LightSnapshot>,
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            current_level: None,
            is_dark: false,
            dark_duration_minutes: 0.0,
            last_update: None,
            history: BoundedHistory::new(MAX_SENSOR_HISTORY),
        }
    }
}

/// All sensor channels of one subject
#[derive(Debug, Clone, Default)]
pub struct SensorState {
    pub motion: MotionState,
    pub location: LocationState,
    pub light: LightState,
}

// =============================================================================
// EVENTS
// =============================================================================

/// Motion update from the device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionEvent {
    pub timestamp: Option<i64>,
    pub is_active: Option<bool>,
    pub steps: Option<u64>,
    pub movement_count: Option<u64>,
    pub last_movement: Option<i64>,
}

/// Fall detected by the device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallEvent {
    pub timestamp: Option<i64>,
    pub magnitude: Option<f64>,
}

/// GPS update from the device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationEvent {
    pub timestamp: Option<i64>,
    pub is_home: Option<bool>,
    pub left_home_today: Option<bool>,
    pub distance: Option<f64>,
}

/// Ambient light update from the device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightEvent {
    pub timestamp: Option<i64>,
    pub current_level: Option<f64>,
    pub is_dark: Option<bool>,
    pub dark_duration: Option<f64>,
}

/// Any sensor event
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Motion(MotionEvent),
    Fall(FallEvent),
    Location(LocationEvent),
    Light(LightEvent),
}

impl MotionEvent {
    /// Read from a device payload (`isActive`, `steps`, `movementCount`, `lastMovement`, `timestamp`)
    pub fn from_json(data: &Value) -> Self {
        Self {
            timestamp: field_i64(data, "timestamp"),
            is_active: field_bool(data, "isActive"),
            steps: field_u64(data, "steps"),
            movement_count: field_u64(data, "movementCount"),
            last_movement: field_i64(data, "lastMovement"),
        }
    }
}

impl FallEvent {
    /// Read from a device payload (`timestamp`, `magnitude`)
    pub fn from_json(data: &Value) -> Self {
        Self {
            timestamp: field_i64(data, "timestamp"),
            magnitude: field_f64(data, "magnitude"),
        }
    }
}

impl LocationEvent {
    /// Read from a device payload (`isHome`, `leftHomeToday`, `distance`, `timestamp`)
    pub fn from_json(data: &Value) -> Self {
        Self {
            timestamp: field_i64(data, "timestamp"),
            is_home: field_bool(data, "isHome"),
            left_home_today: field_bool(data, "leftHomeToday"),
            distance: field_f64(data, "distance"),
        }
    }
}

impl LightEvent {
    /// Read from a device payload (`currentLevel`, `isDark`, `darkDuration`, `timestamp`)
    pub fn from_json(data: &Value) -> Self {
        Self {
            timestamp: field_i64(data, "timestamp"),
            current_level: field_f64(data, "currentLevel"),
            is_dark: field_bool(data, "isDark"),
            dark_duration: field_f64(data, "darkDuration"),
        }
    }
}

impl SensorEvent {
    /// Message `type` tags that carry sensor events
    pub const MOTION: &'static str = "motion_update";
    pub const FALL: &'static str = "fall_alert";
    pub const LOCATION: &'static str = "location_update";
    pub const LIGHT: &'static str = "light_update";

    /// Build the event for a message type tag, None if the tag is not a sensor type
    pub fn from_tagged(kind: &str, data: &Value) -> Option<Self> {
        match kind {
            Self::MOTION => Some(SensorEvent::Motion(MotionEvent::from_json(data))),
            Self::FALL => Some(SensorEvent::Fall(FallEvent::from_json(data))),
            Self::LOCATION => Some(SensorEvent::Location(LocationEvent::from_json(data))),
            Self::LIGHT => Some(SensorEvent::Light(LightEvent::from_json(data))),
            _ => None,
        }
    }

    /// Type tag for this event
    pub fn kind(&self) -> &'static str {
        match self {
            SensorEvent::Motion(_) => Self::MOTION,
            SensorEvent::Fall(_) => Self::FALL,
            SensorEvent::Location(_) => Self::LOCATION,
            SensorEvent::Light(_) => Self::LIGHT,
        }
    }
}

fn field_i64(data: &Value, key: &str) -> Option<i64> {
    let v = data.get(key)?;
    v.as_i64().or_else(|| v.as_f64().map(|f| f as i64))
}

fn field_u64(data: &Value, key: &str) -> Option<u64> {
    let v = data.get(key)?;
    v.as_u64()
        .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}

fn field_f64(data: &Value, key: &str) -> Option<f64> {
    data.get(key)?.as_f64()
}

fn field_bool(data: &Value, key: &str) -> Option<bool> {
    data.get(key)?.as_bool()
}

// =============================================================================
// TESTS
// =============================================================================
