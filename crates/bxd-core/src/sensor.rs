//! Sensors attached to joints

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::xml::{XmlError, XmlWriter, format_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Encoder,
    Limit,
    Potentiometer,
    LimitHall,
}

impl SensorType {
    pub fn xml_name(&self) -> &'static str {
        match self {
            SensorType::Encoder => "Encoder",
            SensorType::Limit => "Limit",
            SensorType::Potentiometer => "Potentiometer",
            SensorType::LimitHall => "LimitHall",
        }
    }
}

/// One sensor attached to a joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSensor {
    pub sensor_type: SensorType,
    #[serde(default)]
    pub port_a: i32,
    /// Second channel, only meaningful for encoders
    #[serde(default = "default_port_b")]
    pub port_b: i32,
    #[serde(default = "default_conversion_factor")]
    pub conversion_factor: f32,
}

fn default_port_b() -> i32 {
    -1
}

fn default_conversion_factor() -> f32 {
    1.0
}

impl JointSensor {
    pub fn new(sensor_type: SensorType, port_a: i32, port_b: i32) -> Self {
        Self {
            sensor_type,
            port_a,
            port_b,
            conversion_factor: default_conversion_factor(),
        }
    }

    pub fn encoder(port_a: i32, port_b: i32) -> Self {
        Self::new(SensorType::Encoder, port_a, port_b)
    }

    pub fn write_xml<W: Write>(&self, output: &mut XmlWriter<W>) -> Result<(), XmlError> {
        output.start_element("RobotSensor")?;
        output.write_element("SensorType", self.sensor_type.xml_name())?;
        output.write_element("SensorPortA", &self.port_a.to_string())?;
        if self.sensor_type == SensorType::Encoder {
            output.write_element("SensorPortB", &self.port_b.to_string())?;
        }
        output.write_element("ConversionFactor", &format_number(self.conversion_factor))?;
        output.end_element()
    }

    pub fn to_json(&self) -> SensorJson {
        SensorJson {
            type_tag: "RobotSensor, RobotExportAPI",
            sensor_type: self.sensor_type,
            port_a: self.port_a,
            port_b: self.port_b,
            conversion_factor: self.conversion_factor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SensorJson {
    #[serde(rename = "$type")]
    pub type_tag: &'static str,
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    #[serde(rename = "portA")]
    pub port_a: i32,
    #[serde(rename = "portB")]
    pub port_b: i32,
    #[serde(rename = "conversionFactor")]
    pub conversion_factor: f32,
}
