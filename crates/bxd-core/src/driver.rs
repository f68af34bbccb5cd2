//! Joint drivers (motors, pneumatics, ...) and wheel metadata

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::math::Vector3;
use crate::mesh::WheelGeometry;
use crate::xml::{XmlError, XmlWriter, format_number};

/// Actuator kind driving a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverType {
    #[default]
    Motor,
    Servo,
    WormScrew,
    BumperPneumatic,
    RelayPneumatic,
    DualMotor,
    Elevator,
}

impl DriverType {
    /// Name used by the skeleton file
    pub fn xml_name(&self) -> &'static str {
        match self {
            DriverType::Motor => "Motor",
            DriverType::Servo => "Servo",
            DriverType::WormScrew => "WormScrew",
            DriverType::BumperPneumatic => "BumperPneumatic",
            DriverType::RelayPneumatic => "RelayPneumatic",
            DriverType::DualMotor => "DualMotor",
            DriverType::Elevator => "Elevator",
        }
    }
}

/// Control signal bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    #[default]
    Pwm,
    Can,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WheelType {
    #[default]
    Normal,
    Omni,
    Mecanum,
}

impl WheelType {
    pub fn xml_name(&self) -> &'static str {
        match self {
            WheelType::Normal => "Normal",
            WheelType::Omni => "Omni",
            WheelType::Mecanum => "Mecanum",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrictionLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl FrictionLevel {
    pub fn xml_name(&self) -> &'static str {
        match self {
            FrictionLevel::Low => "Low",
            FrictionLevel::Medium => "Medium",
            FrictionLevel::High => "High",
        }
    }
}

/// Wheel attached to a rotational driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Wheel {
    pub wheel_type: WheelType,
    pub friction: FrictionLevel,
    pub is_drive_wheel: bool,
    /// Filled from the child mesh during configuration
    pub radius: f32,
    pub width: f32,
    pub center: Vector3,
}

impl Wheel {
    /// Keep the authored wheel kind, replacing dimensions with measured ones
    pub fn with_geometry(self, geometry: WheelGeometry) -> Self {
        Self {
            radius: geometry.radius,
            width: geometry.width,
            center: geometry.center,
            ..self
        }
    }

    pub fn write_xml<W: Write>(&self, output: &mut XmlWriter<W>) -> Result<(), XmlError> {
        output.start_element("WheelDriverMeta")?;
        output.write_element("WheelType", self.wheel_type.xml_name())?;
        output.write_element("WheelRadius", &format_number(self.radius))?;
        output.write_element("WheelWidth", &format_number(self.width))?;

        output.start_element("BXDVector3")?;
        output.write_attribute("VectorID", "WheelCenter")?;
        output.write_vector(&self.center)?;
        output.end_element()?;

        output.write_element("FrictionLevel", self.friction.xml_name())?;
        output.write_element("IsDriveWheel", &self.is_drive_wheel.to_string())?;
        output.end_element()
    }

    pub fn to_json(&self) -> WheelJson {
        WheelJson {
            type_tag: "WheelDriverMeta, RobotExportAPI",
            wheel_type: self.wheel_type,
            friction_level: self.friction,
            is_drive_wheel: self.is_drive_wheel,
            radius: self.radius,
            width: self.width,
            center: self.center,
        }
    }
}

/// Actuation description attached to a joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_type: DriverType,
    #[serde(default)]
    pub port_a: i32,
    #[serde(default = "default_port_b")]
    pub port_b: i32,
    #[serde(default)]
    pub signal: SignalType,
    #[serde(default = "default_gear")]
    pub input_gear: f32,
    #[serde(default = "default_gear")]
    pub output_gear: f32,
    #[serde(default)]
    pub lower_limit: f32,
    #[serde(default)]
    pub upper_limit: f32,
    #[serde(default)]
    pub has_brake: bool,
    #[serde(default)]
    pub wheel: Option<Wheel>,
}

fn default_port_b() -> i32 {
    -1
}

fn default_gear() -> f32 {
    1.0
}

impl Driver {
    pub fn new(driver_type: DriverType) -> Self {
        Self {
            driver_type,
            port_a: 0,
            port_b: default_port_b(),
            signal: SignalType::default(),
            input_gear: default_gear(),
            output_gear: default_gear(),
            lower_limit: 0.0,
            upper_limit: 0.0,
            has_brake: false,
            wheel: None,
        }
    }

    pub fn with_ports(mut self, port_a: i32, port_b: i32) -> Self {
        self.port_a = port_a;
        self.port_b = port_b;
        self
    }

    pub fn with_wheel(mut self, wheel: Wheel) -> Self {
        self.wheel = Some(wheel);
        self
    }

    pub fn write_xml<W: Write>(&self, output: &mut XmlWriter<W>) -> Result<(), XmlError> {
        output.start_element("JointDriver")?;
        output.write_element("DriveType", self.driver_type.xml_name())?;
        output.write_element("Port1", &self.port_a.to_string())?;
        output.write_element("Port2", &self.port_b.to_string())?;
        output.write_element("InputGear", &format_number(self.input_gear))?;
        output.write_element("OutputGear", &format_number(self.output_gear))?;
        output.write_element("LowerLimit", &format_number(self.lower_limit))?;
        output.write_element("UpperLimit", &format_number(self.upper_limit))?;
        output.write_element(
            "SignalType",
            match self.signal {
                SignalType::Pwm => "PWM",
                SignalType::Can => "CAN",
            },
        )?;
        if self.has_brake {
            output.write_element("HasBrake", "true")?;
        }
        if let Some(wheel) = &self.wheel {
            wheel.write_xml(output)?;
        }
        output.end_element()
    }

    pub fn to_json(&self) -> DriverJson {
        DriverJson {
            type_tag: "JointDriver, RobotExportAPI",
            driver_type: self.driver_type,
            port1: self.port_a,
            port2: self.port_b,
            is_can: self.signal == SignalType::Can,
            lower_limit: self.lower_limit,
            upper_limit: self.upper_limit,
            input_gear: self.input_gear,
            output_gear: self.output_gear,
            has_brake: self.has_brake,
            meta_info: self.wheel.iter().map(Wheel::to_json).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WheelJson {
    #[serde(rename = "$type")]
    pub type_tag: &'static str,
    #[serde(rename = "type")]
    pub wheel_type: WheelType,
    #[serde(rename = "frictionLevel")]
    pub friction_level: FrictionLevel,
    #[serde(rename = "isDriveWheel")]
    pub is_drive_wheel: bool,
    pub radius: f32,
    pub width: f32,
    pub center: Vector3,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverJson {
    #[serde(rename = "$type")]
    pub type_tag: &'static str,
    #[serde(rename = "type")]
    pub driver_type: DriverType,
    pub port1: i32,
    pub port2: i32,
    #[serde(rename = "isCan")]
    pub is_can: bool,
    #[serde(rename = "lowerLimit")]
    pub lower_limit: f32,
    #[serde(rename = "upperLimit")]
    pub upper_limit: f32,
    #[serde(rename = "InputGear")]
    pub input_gear: f32,
    #[serde(rename = "OutputGear")]
    pub output_gear: f32,
    #[serde(rename = "hasBrake")]
    pub has_brake: bool,
    #[serde(rename = "MetaInfo")]
    pub meta_info: Vec<WheelJson>,
}
