//! Resource model.
//!
//! Resources are the mobile units that carry out tasks. Each has a type,
//! flight envelope, payload capacity, and a home base it returns to
//! between tasks.

use serde::{Deserialize, Serialize};

use super::clock::DAY_START_MIN;

/// A mobile unit that can be assigned to tasks.
///
/// The record is immutable input. Availability during an allocation run
/// is tracked by the strategy, never written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Resource classification.
    pub resource_type: ResourceType,
    /// Endurance (minutes).
    pub max_flight_time_min: i64,
    /// Cruise ceiling (km/h).
    pub max_speed_kmh: f64,
    /// Payload capacity (kg). Zero means the unit cannot carry anything.
    pub max_payload_kg: f64,
    /// Charge level (0-100).
    pub battery_percent: f64,
    /// Base the unit launches from and returns to.
    pub home_base: String,
    /// Earliest time the unit can start work (minutes-of-day).
    pub available_from_min: i64,
}

/// Resource type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Sensor platform, typically without payload capacity.
    Recon,
    /// Cargo platform.
    Transport,
    /// General-purpose platform with limited payload.
    Multi,
}

impl ResourceType {
    /// Parses a resource type label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "recon" | "reconnaissance" | "侦察型" => Some(ResourceType::Recon),
            "transport" | "运输型" => Some(ResourceType::Transport),
            "multi" | "multi-purpose" | "multipurpose" | "多用途" => Some(ResourceType::Multi),
            _ => None,
        }
    }
}

impl Resource {
    /// Creates a resource available from the default day start.
    pub fn new(id: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            id: id.into(),
            resource_type,
            max_flight_time_min: 0,
            max_speed_kmh: 0.0,
            max_payload_kg: 0.0,
            battery_percent: 100.0,
            home_base: String::new(),
            available_from_min: DAY_START_MIN,
        }
    }

    /// Creates a recon resource.
    pub fn recon(id: impl Into<String>) -> Self {
        Self::new(id, ResourceType::Recon)
    }

    /// Creates a transport resource.
    pub fn transport(id: impl Into<String>) -> Self {
        Self::new(id, ResourceType::Transport)
    }

    /// Creates a multi-purpose resource.
    pub fn multi(id: impl Into<String>) -> Self {
        Self::new(id, ResourceType::Multi)
    }

    /// Sets the endurance.
    pub fn with_flight_time(mut self, minutes: i64) -> Self {
        self.max_flight_time_min = minutes;
        self
    }

    /// Sets the maximum speed.
    pub fn with_speed(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = kmh;
        self
    }

    /// Sets the payload capacity.
    pub fn with_payload(mut self, kg: f64) -> Self {
        self.max_payload_kg = kg;
        self
    }

    /// Sets the battery level, clamped to 0-100.
    pub fn with_battery(mut self, percent: f64) -> Self {
        self.battery_percent = percent.clamp(0.0, 100.0);
        self
    }

    /// Sets the home base.
    pub fn with_home_base(mut self, base: impl Into<String>) -> Self {
        self.home_base = base.into();
        self
    }

    /// Sets the earliest availability (minutes-of-day).
    pub fn with_available_from(mut self, minutes: i64) -> Self {
        self.available_from_min = minutes;
        self
    }

    /// Whether the unit can carry any payload at all.
    pub fn can_carry(&self) -> bool {
        self.max_payload_kg > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::transport("UAV-002")
            .with_flight_time(90)
            .with_speed(60.0)
            .with_payload(5.0)
            .with_battery(85.0)
            .with_home_base("Base A")
            .with_available_from(510);

        assert_eq!(r.id, "UAV-002");
        assert_eq!(r.resource_type, ResourceType::Transport);
        assert_eq!(r.max_flight_time_min, 90);
        assert!((r.max_speed_kmh - 60.0).abs() < 1e-10);
        assert!((r.max_payload_kg - 5.0).abs() < 1e-10);
        assert!((r.battery_percent - 85.0).abs() < 1e-10);
        assert_eq!(r.home_base, "Base A");
        assert_eq!(r.available_from_min, 510);
        assert!(r.can_carry());
    }

    #[test]
    fn test_resource_defaults() {
        let r = Resource::recon("R1");
        assert_eq!(r.available_from_min, DAY_START_MIN);
        assert!(!r.can_carry());
        assert!((r.battery_percent - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_battery_clamping() {
        assert!((Resource::multi("M").with_battery(140.0).battery_percent - 100.0).abs() < 1e-10);
        assert!((Resource::multi("M").with_battery(-3.0).battery_percent - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_resource_type_parse() {
        assert_eq!(ResourceType::parse("Multi-Purpose"), Some(ResourceType::Multi));
        assert_eq!(ResourceType::parse("transport"), Some(ResourceType::Transport));
        assert_eq!(ResourceType::parse("tanker"), None);
        assert_eq!(ResourceType::parse("侦察型"), Some(ResourceType::Recon));
        assert_eq!(ResourceType::parse("运输型"), Some(ResourceType::Transport));
        assert_eq!(ResourceType::parse("多用途"), Some(ResourceType::Multi));
    }
}
