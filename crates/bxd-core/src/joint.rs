//! Joint hierarchy: rotational, sliding and fixed connections between nodes
//!
//! Each joint carries the kinematic snapshot taken from the CAD model plus the
//! driver and sensors attached by the configuration pass. Limit bounds are
//! stored as `Option`s so an enabled flag can never be read without its value;
//! the legacy "unbounded" sentinels are only produced by the query methods.

use std::io::Write;

use serde::{Serialize, Serializer};

use crate::config::ConfigData;
use crate::driver::{Driver, DriverJson};
use crate::matcher::match_joint;
use crate::math::Vector3;
use crate::mesh::Mesh;
use crate::sensor::{JointSensor, SensorJson, SensorType};
use crate::xml::{XmlError, XmlWriter, format_number};

/// Bound reported by a sliding joint whose limit is disabled
pub const SLIDING_UNBOUNDED: f32 = 999.0;

/// Optional lower and upper bound of a joint's travel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeLimits {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl RangeLimits {
    /// No bound enabled
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Hinge about an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationalMotion {
    pub axis: Vector3,
    /// Current angle at export time
    pub angle: f32,
    pub limits: RangeLimits,
}

/// Prismatic slide along an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlidingMotion {
    pub axis: Vector3,
    /// Current translation at export time
    pub offset: f32,
    pub limits: RangeLimits,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    Rotational(RotationalMotion),
    Sliding(SlidingMotion),
    Fixed,
}

impl JointKind {
    /// Interchange tag written to `typeSave`
    pub fn type_save(&self) -> &'static str {
        match self {
            JointKind::Rotational(_) => "ROTATIONAL",
            JointKind::Sliding(_) => "LINEAR",
            JointKind::Fixed => "FIXED",
        }
    }

    /// Element name in the skeleton file
    pub fn xml_name(&self) -> &'static str {
        match self {
            JointKind::Rotational(_) => "RotationalJoint",
            JointKind::Sliding(_) => "LinearJoint",
            JointKind::Fixed => "FixedJoint",
        }
    }

    fn type_tag(&self) -> &'static str {
        match self {
            JointKind::Rotational(_) => "RotationalJoint, RobotExportAPI",
            JointKind::Sliding(_) => "SliderJoint, RobotExportAPI",
            JointKind::Fixed => "FixedJoint, RobotExportAPI",
        }
    }
}

/// Joint-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum JointError {
    #[error("Joint '{joint}' has a malformed axis ({axis:?})")]
    MalformedAxis { joint: String, axis: Vector3 },
    #[error(transparent)]
    Xml(#[from] XmlError),
}

/// Result of one configuration pass over a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppliedConfig {
    pub matched: bool,
    pub driver_attached: bool,
    pub sensors_attached: usize,
    pub sensors_dropped: usize,
}

/// Connection from a rigid node to its parent
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Identifier matched against configuration keys
    pub name: String,
    pub child_base_point: Vector3,
    /// Weight in kg, set from configuration
    pub weight: f32,
    pub kind: JointKind,
    driver: Option<Driver>,
    sensors: Vec<JointSensor>,
}

impl Joint {
    pub fn new(name: impl Into<String>, child_base_point: Vector3, kind: JointKind) -> Self {
        Self {
            name: name.into(),
            child_base_point,
            weight: 0.0,
            kind,
            driver: None,
            sensors: Vec::new(),
        }
    }

    pub fn builder(name: impl Into<String>) -> JointBuilder {
        JointBuilder::new(name)
    }

    pub fn driver(&self) -> Option<&Driver> {
        self.driver.as_ref()
    }

    pub fn sensors(&self) -> &[JointSensor] {
        &self.sensors
    }

    /// Unit axis of motion. Fixed joints report the zero vector.
    pub fn axis(&self) -> Result<Vector3, JointError> {
        let raw = match &self.kind {
            JointKind::Rotational(m) => m.axis,
            JointKind::Sliding(m) => m.axis,
            JointKind::Fixed => return Ok(Vector3::ZERO),
        };
        raw.normalize().ok_or_else(|| JointError::MalformedAxis {
            joint: self.name.clone(),
            axis: raw,
        })
    }

    /// Angle or translation captured at export time
    pub fn current_value(&self) -> f32 {
        match &self.kind {
            JointKind::Rotational(m) => m.angle,
            JointKind::Sliding(m) => m.offset,
            JointKind::Fixed => 0.0,
        }
    }

    /// Rotational joints have limits when either bound is enabled; sliding
    /// joints always report bounds.
    pub fn has_limits(&self) -> bool {
        match &self.kind {
            JointKind::Rotational(m) => m.limits.any_enabled(),
            JointKind::Sliding(_) => true,
            JointKind::Fixed => false,
        }
    }

    /// Lower bound. A disabled rotational bound yields `f32::MIN_POSITIVE`
    /// (written as zero), a disabled sliding bound yields `-999`.
    pub fn min_value(&self) -> f32 {
        match &self.kind {
            JointKind::Rotational(m) => m.limits.min.unwrap_or(f32::MIN_POSITIVE),
            JointKind::Sliding(m) => m.limits.min.unwrap_or(-SLIDING_UNBOUNDED),
            JointKind::Fixed => 0.0,
        }
    }

    /// Upper bound. A disabled rotational bound yields `f32::MAX`, a disabled
    /// sliding bound yields `999`.
    pub fn max_value(&self) -> f32 {
        match &self.kind {
            JointKind::Rotational(m) => m.limits.max.unwrap_or(f32::MAX),
            JointKind::Sliding(m) => m.limits.max.unwrap_or(SLIDING_UNBOUNDED),
            JointKind::Fixed => 0.0,
        }
    }

    /// Sensor kinds this joint can carry
    pub fn accepts_sensor(&self, sensor_type: SensorType) -> bool {
        match &self.kind {
            JointKind::Rotational(_) => sensor_type == SensorType::Encoder,
            // No limit sensors are implemented for sliders yet
            JointKind::Sliding(_) => false,
            JointKind::Fixed => false,
        }
    }

    pub fn accepts_driver(&self) -> bool {
        !matches!(self.kind, JointKind::Fixed)
    }

    /// Attach the driver and sensors configured for this joint.
    ///
    /// Replaces whatever a previous pass attached, so repeating the call with
    /// the same configuration leaves the same state. Sensors this joint kind
    /// does not support are dropped. A wheel driver on a rotational joint gets
    /// its radius, width and center measured from `child_mesh`.
    pub fn apply_config(
        &mut self,
        config: &ConfigData,
        child_mesh: &Mesh,
    ) -> Result<AppliedConfig, JointError> {
        let attachment = match_joint(config, &self.name);
        let matched = config.get(&self.name).is_some();

        let mut driver = attachment.driver.filter(|_| self.accepts_driver());
        if let Some(d) = driver.as_mut()
            && let Some(wheel) = d.wheel
            && matches!(self.kind, JointKind::Rotational(_))
        {
            let axis = self.axis()?;
            if let Some(geometry) = child_mesh.measure_wheel(self.child_base_point, axis) {
                d.wheel = Some(wheel.with_geometry(geometry));
            }
        }
        self.driver = driver;

        let total = attachment.sensors.len();
        let sensors: Vec<JointSensor> = attachment
            .sensors
            .into_iter()
            .filter(|s| self.accepts_sensor(s.sensor_type))
            .collect();
        self.sensors = sensors;
        let dropped = total - self.sensors.len();
        if dropped > 0 {
            tracing::debug!(
                "Dropped {} unsupported sensor(s) on {} joint '{}'",
                dropped,
                self.kind.xml_name(),
                self.name
            );
        }

        if let Some(weight) = attachment.weight {
            self.weight = weight;
        }

        Ok(AppliedConfig {
            matched,
            driver_attached: self.driver.is_some(),
            sensors_attached: self.sensors.len(),
            sensors_dropped: dropped,
        })
    }

    /// Write the joint element followed by its driver and sensors
    pub fn write_xml<W: Write>(&self, output: &mut XmlWriter<W>) -> Result<(), JointError> {
        output.start_element(self.kind.xml_name())?;
        write_vector_element(output, "BasePoint", &self.child_base_point)?;

        match &self.kind {
            JointKind::Rotational(m) => {
                write_vector_element(output, "Axis", &self.axis()?)?;
                if self.has_limits() {
                    output.write_element("AngularLowLimit", &format_number(self.min_value()))?;
                    output.write_element("AngularHighLimit", &format_number(self.max_value()))?;
                }
                output.write_element("CurrentAngularPosition", &format_number(m.angle))?;
            }
            JointKind::Sliding(m) => {
                write_vector_element(output, "Axis", &self.axis()?)?;
                output.write_element("LinearLowLimit", &format_number(self.min_value()))?;
                output.write_element("LinearUpperLimit", &format_number(self.max_value()))?;
                output.write_element("CurrentLinearPosition", &format_number(m.offset))?;
            }
            JointKind::Fixed => {}
        }
        output.end_element()?;

        if let Some(driver) = &self.driver {
            driver.write_xml(output)?;
        }
        for sensor in &self.sensors {
            sensor.write_xml(output)?;
        }
        Ok(())
    }

    /// JSON projection with limits rounded to two decimals
    pub fn to_json(&self) -> Result<JointJson, JointError> {
        let common = JointCommonJson {
            type_tag: self.kind.type_tag(),
            type_save: self.kind.type_save(),
            base_point: self.child_base_point,
            weight: self.weight,
            attached_sensors: self.sensors.iter().map(JointSensor::to_json).collect(),
            c_driver: self.driver.as_ref().map(Driver::to_json),
        };

        Ok(match &self.kind {
            JointKind::Rotational(m) => JointJson::Rotational {
                common,
                axis: self.axis()?,
                current_angular_position: m.angle,
                has_angular_limit: self.has_limits(),
                angular_limit_low: round_limit(self.min_value()),
                angular_limit_high: round_limit(self.max_value()),
            },
            JointKind::Sliding(m) => JointJson::Linear {
                common,
                axis: self.axis()?,
                current_linear_position: m.offset,
                linear_limit_low: round_limit(self.min_value()),
                linear_limit_high: round_limit(self.max_value()),
            },
            JointKind::Fixed => JointJson::Fixed { common },
        })
    }
}

fn write_vector_element<W: Write>(
    output: &mut XmlWriter<W>,
    id: &str,
    v: &Vector3,
) -> Result<(), XmlError> {
    output.start_element("BXDVector3")?;
    output.write_attribute("VectorID", id)?;
    output.write_vector(v)?;
    output.end_element()
}

/// Round to two decimal places; negative zero is written as zero.
///
/// `None` (JSON `null`) when the value scaled by 100 overflows `f32`, which is
/// what a disabled rotational upper bound produces.
pub fn round_limit(value: f32) -> Option<f64> {
    if !(value * 100.0).is_finite() {
        return None;
    }
    let rounded = (f64::from(value) * 100.0).round() / 100.0;
    Some(if rounded == 0.0 { 0.0 } else { rounded })
}

/// Fields shared by every joint kind in the JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JointCommonJson {
    #[serde(rename = "$type")]
    pub type_tag: &'static str,
    #[serde(rename = "typeSave")]
    pub type_save: &'static str,
    #[serde(rename = "basePoint")]
    pub base_point: Vector3,
    pub weight: f32,
    #[serde(rename = "attachedSensors")]
    pub attached_sensors: Vec<SensorJson>,
    #[serde(rename = "cDriver", serialize_with = "driver_or_empty")]
    pub c_driver: Option<DriverJson>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JointJson {
    Rotational {
        #[serde(flatten)]
        common: JointCommonJson,
        axis: Vector3,
        #[serde(rename = "currentAngularPosition")]
        current_angular_position: f32,
        #[serde(rename = "hasAngularLimit")]
        has_angular_limit: bool,
        #[serde(rename = "angularLimitLow")]
        angular_limit_low: Option<f64>,
        #[serde(rename = "angularLimitHigh")]
        angular_limit_high: Option<f64>,
    },
    Linear {
        #[serde(flatten)]
        common: JointCommonJson,
        axis: Vector3,
        #[serde(rename = "currentLinearPosition")]
        current_linear_position: f32,
        #[serde(rename = "linearLimitLow")]
        linear_limit_low: Option<f64>,
        #[serde(rename = "linearLimitHigh")]
        linear_limit_high: Option<f64>,
    },
    Fixed {
        #[serde(flatten)]
        common: JointCommonJson,
    },
}

/// An undriven joint is written as an empty `cDriver` object
fn driver_or_empty<S: Serializer>(driver: &Option<DriverJson>, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    match driver {
        Some(d) => d.serialize(s),
        None => s.serialize_map(Some(0))?.end(),
    }
}

/// Fluent construction of joints
#[derive(Debug, Clone)]
pub struct JointBuilder {
    name: String,
    base_point: Vector3,
    weight: f32,
    kind: JointKind,
}

impl JointBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_point: Vector3::ZERO,
            weight: 0.0,
            kind: JointKind::Fixed,
        }
    }

    /// Rotate about `axis`, keeping any value and limits already set
    pub fn rotational(mut self, axis: Vector3) -> Self {
        let (value, limits) = self.value_and_limits();
        self.kind = JointKind::Rotational(RotationalMotion {
            axis,
            angle: value,
            limits,
        });
        self
    }

    /// Slide along `axis`, keeping any value and limits already set
    pub fn sliding(mut self, axis: Vector3) -> Self {
        let (value, limits) = self.value_and_limits();
        self.kind = JointKind::Sliding(SlidingMotion {
            axis,
            offset: value,
            limits,
        });
        self
    }

    pub fn fixed(mut self) -> Self {
        self.kind = JointKind::Fixed;
        self
    }

    pub fn base_point(mut self, base_point: Vector3) -> Self {
        self.base_point = base_point;
        self
    }

    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Current angle or translation
    pub fn value(mut self, value: f32) -> Self {
        match &mut self.kind {
            JointKind::Rotational(m) => m.angle = value,
            JointKind::Sliding(m) => m.offset = value,
            JointKind::Fixed => {}
        }
        self
    }

    pub fn limits(mut self, limits: RangeLimits) -> Self {
        match &mut self.kind {
            JointKind::Rotational(m) => m.limits = limits,
            JointKind::Sliding(m) => m.limits = limits,
            JointKind::Fixed => {}
        }
        self
    }

    pub fn limits_range(self, min: f32, max: f32) -> Self {
        self.limits(RangeLimits::new(min, max))
    }

    pub fn build(self) -> Joint {
        let mut joint = Joint::new(self.name, self.base_point, self.kind);
        joint.weight = self.weight;
        joint
    }

    fn value_and_limits(&self) -> (f32, RangeLimits) {
        match &self.kind {
            JointKind::Rotational(m) => (m.angle, m.limits),
            JointKind::Sliding(m) => (m.offset, m.limits),
            JointKind::Fixed => (0.0, RangeLimits::none()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JointConfig;
    use crate::driver::{DriverType, Wheel};
    use approx::assert_relative_eq;

    fn hinge(limits: RangeLimits) -> Joint {
        Joint::builder("hinge")
            .rotational(Vector3::new(0.0, 0.0, 2.0))
            .value(0.5)
            .limits(limits)
            .build()
    }

    fn slider(limits: RangeLimits) -> Joint {
        Joint::builder("slider")
            .sliding(Vector3::X)
            .value(0.25)
            .limits(limits)
            .build()
    }

    fn config_for(name: &str, sensors: Vec<JointSensor>) -> ConfigData {
        let mut config = ConfigData::new();
        config.insert(
            name,
            JointConfig {
                driver: Some(Driver::new(DriverType::Motor).with_ports(1, 2)),
                sensors,
                weight: Some(2.0),
            },
        );
        config
    }

    fn render(joint: &Joint) -> String {
        let mut output = XmlWriter::new(Vec::new());
        joint.write_xml(&mut output).unwrap();
        String::from_utf8(output.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_axis_is_normalized() {
        assert_eq!(hinge(RangeLimits::none()).axis().unwrap(), Vector3::Z);
        assert_eq!(Joint::builder("f").build().axis().unwrap(), Vector3::ZERO);
    }

    #[test]
    fn test_malformed_axis_is_an_error() {
        let joint = Joint::builder("bad").rotational(Vector3::ZERO).build();
        assert!(matches!(
            joint.axis(),
            Err(JointError::MalformedAxis { ref joint, .. }) if joint.as_str() == "bad"
        ));
        assert!(joint.to_json().is_err());
    }

    #[test]
    fn test_rotational_unbounded_sentinels() {
        let joint = hinge(RangeLimits::none());
        assert!(!joint.has_limits());
        assert_eq!(joint.min_value(), f32::MIN_POSITIVE);
        assert_eq!(joint.max_value(), f32::MAX);
    }

    #[test]
    fn test_rotational_single_bound() {
        let joint = hinge(RangeLimits {
            min: Some(-1.0),
            max: None,
        });
        assert!(joint.has_limits());
        assert_eq!(joint.min_value(), -1.0);
        assert_eq!(joint.max_value(), f32::MAX);

        let joint = hinge(RangeLimits {
            min: None,
            max: Some(1.0),
        });
        assert!(joint.has_limits());
        assert_eq!(joint.min_value(), f32::MIN_POSITIVE);
        assert_eq!(joint.max_value(), 1.0);
    }

    #[test]
    fn test_rotational_half_bounded_output() {
        let upper_only = hinge(RangeLimits {
            min: None,
            max: Some(1.0),
        });
        let xml = render(&upper_only);
        assert!(xml.contains("<AngularLowLimit>0.000000</AngularLowLimit>"));
        assert!(xml.contains("<AngularHighLimit>1.000000</AngularHighLimit>"));
        let json = serde_json::to_value(upper_only.to_json().unwrap()).unwrap();
        assert_eq!(json["hasAngularLimit"], true);
        assert_eq!(json["angularLimitLow"], 0.0);
        assert_eq!(json["angularLimitHigh"], 1.0);

        let lower_only = hinge(RangeLimits {
            min: Some(-1.0),
            max: None,
        });
        let xml = render(&lower_only);
        assert!(xml.contains(
            "<AngularHighLimit>340282346638528859811704183484516925440.000000</AngularHighLimit>"
        ));
        let json = serde_json::to_value(lower_only.to_json().unwrap()).unwrap();
        assert_eq!(json["angularLimitLow"], -1.0);
        assert!(json["angularLimitHigh"].is_null());
    }

    #[test]
    fn test_sliding_sentinels() {
        let joint = slider(RangeLimits::none());
        assert!(joint.has_limits());
        assert_eq!(joint.min_value(), -999.0);
        assert_eq!(joint.max_value(), 999.0);

        let joint = slider(RangeLimits::new(0.0, 0.3));
        assert_eq!(joint.min_value(), 0.0);
        assert_eq!(joint.max_value(), 0.3);
    }

    #[test]
    fn test_builder_keeps_value_across_kind_change() {
        let joint = Joint::builder("j")
            .rotational(Vector3::Y)
            .value(1.25)
            .limits_range(-1.0, 1.0)
            .sliding(Vector3::X)
            .build();
        assert!(matches!(joint.kind, JointKind::Sliding(_)));
        assert_eq!(joint.current_value(), 1.25);
        assert_eq!(joint.max_value(), 1.0);
    }

    #[test]
    fn test_rotational_keeps_only_encoders() {
        let mut joint = hinge(RangeLimits::none());
        let config = config_for(
            "hinge",
            vec![
                JointSensor::new(SensorType::Limit, 5, -1),
                JointSensor::encoder(1, 2),
                JointSensor::new(SensorType::Potentiometer, 6, -1),
                JointSensor::encoder(3, 4),
            ],
        );

        let applied = joint.apply_config(&config, &Mesh::default()).unwrap();
        assert!(applied.matched);
        assert_eq!(applied.sensors_attached, 2);
        assert_eq!(applied.sensors_dropped, 2);
        assert!(
            joint
                .sensors()
                .iter()
                .all(|s| s.sensor_type == SensorType::Encoder)
        );
        assert_eq!(joint.sensors()[0].port_a, 1);
        assert_eq!(joint.sensors()[1].port_a, 3);
        assert_eq!(joint.weight, 2.0);
    }

    #[test]
    fn test_sliding_keeps_no_sensors() {
        let mut joint = slider(RangeLimits::none());
        let config = config_for("slider", vec![JointSensor::encoder(1, 2)]);
        joint.apply_config(&config, &Mesh::default()).unwrap();
        assert!(joint.sensors().is_empty());
        assert!(joint.driver().is_some());
    }

    #[test]
    fn test_fixed_accepts_nothing() {
        let mut joint = Joint::builder("weld").build();
        let config = config_for("weld", vec![JointSensor::encoder(1, 2)]);
        let applied = joint.apply_config(&config, &Mesh::default()).unwrap();
        assert!(applied.matched);
        assert!(!applied.driver_attached);
        assert!(joint.sensors().is_empty());
    }

    #[test]
    fn test_apply_config_is_idempotent() {
        let config = config_for("hinge", vec![JointSensor::encoder(1, 2)]);
        let mut once = hinge(RangeLimits::none());
        once.apply_config(&config, &Mesh::default()).unwrap();

        let mut twice = once.clone();
        twice.apply_config(&config, &Mesh::default()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.sensors().len(), 1);
    }

    #[test]
    fn test_unmatched_joint_stays_undriven() {
        let mut joint = hinge(RangeLimits::none());
        let applied = joint
            .apply_config(&config_for("other", vec![]), &Mesh::default())
            .unwrap();
        assert_eq!(applied, AppliedConfig::default());
        assert!(joint.driver().is_none());
        assert_eq!(joint.weight, 0.0);
    }

    #[test]
    fn test_wheel_measured_from_child_mesh() {
        let mut config = ConfigData::new();
        config.insert(
            "hinge",
            JointConfig {
                driver: Some(Driver::new(DriverType::Motor).with_wheel(Wheel::default())),
                ..Default::default()
            },
        );
        let mesh = Mesh::new(
            vec![[0.1, 0.0, -0.02], [-0.1, 0.0, 0.02], [0.0, 0.1, 0.0]],
            vec![0, 1, 2],
        );

        let mut joint = hinge(RangeLimits::none());
        joint.apply_config(&config, &mesh).unwrap();

        let wheel = joint.driver().unwrap().wheel.unwrap();
        assert_relative_eq!(wheel.radius, 0.1, epsilon = 1e-6);
        assert_relative_eq!(wheel.width, 0.04, epsilon = 1e-6);
    }

    #[test]
    fn test_round_limit() {
        assert_eq!(round_limit(1.23456), Some(1.23));
        assert_eq!(round_limit(-45.0), Some(-45.0));
        assert_eq!(round_limit(-0.001), Some(0.0));
        assert!(round_limit(-0.001).unwrap().is_sign_positive());
        assert_eq!(round_limit(f32::MIN_POSITIVE), Some(0.0));
        assert_eq!(round_limit(f32::MAX), None);
    }

    #[test]
    fn test_rotational_json() {
        let json = serde_json::to_value(
            hinge(RangeLimits::new(-0.785398, 1.5707964))
                .to_json()
                .unwrap(),
        )
        .unwrap();

        assert_eq!(json["$type"], "RotationalJoint, RobotExportAPI");
        assert_eq!(json["typeSave"], "ROTATIONAL");
        assert_eq!(json["hasAngularLimit"], true);
        assert_eq!(json["angularLimitLow"], -0.79);
        assert_eq!(json["angularLimitHigh"], 1.57);
        assert_eq!(json["axis"], serde_json::json!({ "x": 0.0, "y": 0.0, "z": 1.0 }));
        assert_eq!(json["currentAngularPosition"], 0.5);
        assert_eq!(json["attachedSensors"], serde_json::json!([]));
        assert_eq!(json["cDriver"], serde_json::json!({}));
    }

    #[test]
    fn test_linear_json() {
        let json = serde_json::to_value(slider(RangeLimits::none()).to_json().unwrap()).unwrap();
        assert_eq!(json["$type"], "SliderJoint, RobotExportAPI");
        assert_eq!(json["typeSave"], "LINEAR");
        assert_eq!(json["linearLimitLow"], -999.0);
        assert_eq!(json["linearLimitHigh"], 999.0);
        assert_eq!(json["currentLinearPosition"], 0.25);
        assert!(json.get("hasAngularLimit").is_none());
    }

    #[test]
    fn test_rotational_xml() {
        let xml = render(&hinge(RangeLimits::new(-1.0, 1.0)));
        assert!(xml.starts_with("<RotationalJoint>"));
        assert!(xml.contains(r#"<BXDVector3 VectorID="BasePoint">"#));
        assert!(xml.contains(r#"<BXDVector3 VectorID="Axis">"#));
        assert!(xml.contains("<AngularLowLimit>-1.000000</AngularLowLimit>"));
        assert!(xml.contains("<AngularHighLimit>1.000000</AngularHighLimit>"));
        assert!(xml.contains("<CurrentAngularPosition>0.500000</CurrentAngularPosition>"));
    }

    #[test]
    fn test_rotational_xml_omits_disabled_limits() {
        let xml = render(&hinge(RangeLimits::none()));
        assert!(!xml.contains("AngularLowLimit"));
        assert!(!xml.contains("AngularHighLimit"));
    }

    #[test]
    fn test_linear_xml_with_driver() {
        let mut joint = slider(RangeLimits::none());
        joint
            .apply_config(&config_for("slider", vec![]), &Mesh::default())
            .unwrap();
        let xml = render(&joint);

        assert!(xml.starts_with("<LinearJoint>"));
        assert!(xml.contains("<LinearLowLimit>-999.000000</LinearLowLimit>"));
        assert!(xml.contains("<LinearUpperLimit>999.000000</LinearUpperLimit>"));
        assert!(xml.contains("<CurrentLinearPosition>0.250000</CurrentLinearPosition>"));
        let joint_end = xml.find("</LinearJoint>").unwrap();
        assert!(xml.find("<JointDriver>").unwrap() > joint_end);
    }
}
