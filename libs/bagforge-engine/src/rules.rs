//! Literal sample values per message type.
//!
//! A rule only names the fields it pins down. Anything it leaves out is taken
//! from the nested type's own rule, then from the declared `.msg` default,
//! then from the shape-category default in [`crate::synth`].

/// Field value as written in a rule, coerced to the declared primitive at
/// synthesis time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(&'static str),
    Ints(&'static [i64]),
    Floats(&'static [f64]),
    Strs(&'static [&'static str]),
    /// Every element of a fixed-length array.
    Fill(f64),
    /// Overrides for a nested message.
    Struct(&'static [Override]),
    /// One nested message per block.
    Structs(&'static [&'static [Override]]),
    /// The synthesizer clock, for `builtin_interfaces/msg/Time` fields.
    Now,
}

pub type Override = (&'static str, Literal);

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub type_name: &'static str,
    pub fields: &'static [Override],
}

pub fn rule_for(type_name: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.type_name == type_name)
}

/// Look up one field in an override list.
pub fn find(overrides: &[Override], field: &str) -> Option<Literal> {
    overrides.iter().find(|(name, _)| *name == field).map(|(_, lit)| *lit)
}

macro_rules! xyz {
    ($x:expr, $y:expr, $z:expr) => {
        &[("x", Literal::Float($x)), ("y", Literal::Float($y)), ("z", Literal::Float($z))]
    };
}

macro_rules! rule {
    ($name:literal) => {
        Rule { type_name: $name, fields: &[] }
    };
    ($name:literal, $($field:literal => $lit:expr),+ $(,)?) => {
        Rule { type_name: $name, fields: &[$(($field, $lit)),+] }
    };
}

use Literal::*;

const NONE: &[Override] = &[];

pub static RULES: &[Rule] = &[
    // ── std_msgs ───────────────────────────────────────────────
    rule!("std_msgs/msg/Bool", "data" => Bool(true)),
    rule!("std_msgs/msg/Byte", "data" => Int(42)),
    rule!("std_msgs/msg/Char", "data" => Int(65)),
    rule!("std_msgs/msg/Empty"),
    rule!("std_msgs/msg/Float32", "data" => Float(3.14159)),
    rule!("std_msgs/msg/Float64", "data" => Float(2.71828)),
    rule!("std_msgs/msg/Int8", "data" => Int(-42)),
    rule!("std_msgs/msg/Int16", "data" => Int(-1000)),
    rule!("std_msgs/msg/Int32", "data" => Int(-100_000)),
    rule!("std_msgs/msg/Int64", "data" => Int(-10_000_000_000)),
    rule!("std_msgs/msg/UInt8", "data" => Int(255)),
    rule!("std_msgs/msg/UInt16", "data" => Int(65535)),
    rule!("std_msgs/msg/UInt32", "data" => Int(4_294_967_295)),
    rule!("std_msgs/msg/UInt64", "data" => UInt(u64::MAX)),
    rule!("std_msgs/msg/String", "data" => Str("Hello, ROS2!")),
    rule!("std_msgs/msg/Header", "stamp" => Now, "frame_id" => Str("test_frame")),
    rule!("std_msgs/msg/ColorRGBA", "r" => Float(1.0), "g" => Float(0.5), "b" => Float(0.0), "a" => Float(0.8)),
    rule!(
        "std_msgs/msg/MultiArrayLayout",
        "dim" => Structs(&[
            &[("label", Str("rows")), ("size", Int(1)), ("stride", Int(3))],
            &[("label", Str("cols")), ("size", Int(3)), ("stride", Int(3))],
        ]),
        "data_offset" => Int(0),
    ),
    rule!(
        "std_msgs/msg/MultiArrayDimension",
        "label" => Str("dimension"),
        "size" => Int(10),
        "stride" => Int(10),
    ),
    rule!("std_msgs/msg/Float32MultiArray", "data" => Floats(&[1.1, 2.2, 3.3])),
    rule!("std_msgs/msg/Float64MultiArray", "data" => Floats(&[1.11, 2.22, 3.33])),
    rule!("std_msgs/msg/Int8MultiArray", "data" => Ints(&[1, 2, 3])),
    rule!("std_msgs/msg/Int16MultiArray", "data" => Ints(&[10, 20, 30])),
    rule!("std_msgs/msg/Int32MultiArray", "data" => Ints(&[1, 2, 3])),
    rule!("std_msgs/msg/Int64MultiArray", "data" => Ints(&[100, 200, 300])),
    rule!("std_msgs/msg/UInt8MultiArray", "data" => Ints(&[1, 2, 3])),
    rule!("std_msgs/msg/UInt16MultiArray", "data" => Ints(&[10, 20, 30])),
    rule!("std_msgs/msg/UInt32MultiArray", "data" => Ints(&[100, 200, 300])),
    rule!("std_msgs/msg/UInt64MultiArray", "data" => Ints(&[1000, 2000, 3000])),
    rule!("std_msgs/msg/ByteMultiArray", "data" => Ints(&[65, 66, 67])),
    // ── geometry_msgs ──────────────────────────────────────────
    rule!("geometry_msgs/msg/Point", "x" => Float(1.0), "y" => Float(2.0), "z" => Float(3.0)),
    rule!("geometry_msgs/msg/Point32", "x" => Float(1.5), "y" => Float(2.5), "z" => Float(3.5)),
    rule!("geometry_msgs/msg/Vector3", "x" => Float(0.1), "y" => Float(0.2), "z" => Float(0.3)),
    rule!(
        "geometry_msgs/msg/Quaternion",
        "x" => Float(0.0),
        "y" => Float(0.0),
        "z" => Float(0.0),
        "w" => Float(1.0),
    ),
    rule!("geometry_msgs/msg/Pose"),
    rule!("geometry_msgs/msg/Pose2D", "x" => Float(1.0), "y" => Float(2.0), "theta" => Float(0.5)),
    rule!("geometry_msgs/msg/Transform", "translation" => Struct(xyz!(1.0, 2.0, 3.0))),
    rule!(
        "geometry_msgs/msg/Twist",
        "linear" => Struct(xyz!(1.0, 0.0, 0.0)),
        "angular" => Struct(xyz!(0.0, 0.0, 0.5)),
    ),
    rule!(
        "geometry_msgs/msg/Accel",
        "linear" => Struct(xyz!(0.1, 0.2, 9.8)),
        "angular" => Struct(xyz!(0.0, 0.0, 0.1)),
    ),
    rule!(
        "geometry_msgs/msg/Wrench",
        "force" => Struct(xyz!(10.0, 5.0, 2.0)),
        "torque" => Struct(xyz!(0.1, 0.2, 0.3)),
    ),
    rule!(
        "geometry_msgs/msg/Inertia",
        "m" => Float(1.5),
        "com" => Struct(xyz!(0.0, 0.0, 0.0)),
        "ixx" => Float(0.1),
        "ixy" => Float(0.0),
        "ixz" => Float(0.0),
        "iyy" => Float(0.1),
        "iyz" => Float(0.0),
        "izz" => Float(0.1),
    ),
    rule!("geometry_msgs/msg/PointStamped"),
    rule!("geometry_msgs/msg/PoseStamped"),
    rule!("geometry_msgs/msg/TransformStamped", "child_frame_id" => Str("child_frame")),
    rule!("geometry_msgs/msg/TwistStamped"),
    rule!("geometry_msgs/msg/AccelStamped"),
    rule!("geometry_msgs/msg/WrenchStamped"),
    rule!("geometry_msgs/msg/Vector3Stamped", "vector" => Struct(xyz!(1.0, 2.0, 3.0))),
    rule!("geometry_msgs/msg/QuaternionStamped"),
    rule!("geometry_msgs/msg/InertiaStamped"),
    rule!(
        "geometry_msgs/msg/Polygon",
        "points" => Structs(&[
            xyz!(0.0, 0.0, 0.0),
            xyz!(1.0, 0.0, 0.0),
            xyz!(1.0, 1.0, 0.0),
            xyz!(0.0, 1.0, 0.0),
        ]),
    ),
    rule!("geometry_msgs/msg/PolygonStamped"),
    rule!(
        "geometry_msgs/msg/PoseArray",
        "poses" => Structs(&[
            &[("position", Struct(xyz!(0.0, 0.0, 0.0)))],
            &[("position", Struct(xyz!(1.0, 1.0, 0.0)))],
        ]),
    ),
    rule!("geometry_msgs/msg/PoseWithCovariance", "covariance" => Fill(0.1)),
    rule!("geometry_msgs/msg/PoseWithCovarianceStamped"),
    rule!("geometry_msgs/msg/TwistWithCovariance", "covariance" => Fill(0.01)),
    rule!("geometry_msgs/msg/TwistWithCovarianceStamped"),
    rule!("geometry_msgs/msg/AccelWithCovariance", "covariance" => Fill(0.1)),
    rule!("geometry_msgs/msg/AccelWithCovarianceStamped"),
    // ── sensor_msgs ────────────────────────────────────────────
    rule!(
        "sensor_msgs/msg/LaserScan",
        "angle_min" => Float(-1.57),
        "angle_max" => Float(1.57),
        "angle_increment" => Float(0.01),
        "time_increment" => Float(0.0),
        "scan_time" => Float(0.1),
        "range_min" => Float(0.1),
        "range_max" => Float(10.0),
        "ranges" => Floats(&[1.0, 2.0, 3.0, 4.0]),
        "intensities" => Floats(&[100.0, 200.0, 300.0, 400.0]),
    ),
    rule!(
        "sensor_msgs/msg/Image",
        "height" => Int(1),
        "width" => Int(1),
        "encoding" => Str("rgb8"),
        "is_bigendian" => Int(0),
        "step" => Int(3),
        "data" => Ints(&[255, 128, 0]),
    ),
    rule!(
        "sensor_msgs/msg/PointCloud",
        "points" => Structs(&[xyz!(1.0, 2.0, 3.0), xyz!(4.0, 5.0, 6.0), xyz!(7.0, 8.0, 9.0)]),
        "channels" => Structs(&[
            NONE,
            &[("name", Str("range")), ("values", Floats(&[1.5, 2.5, 3.5]))],
        ]),
    ),
    rule!(
        "sensor_msgs/msg/PointCloud2",
        "height" => Int(1),
        "width" => Int(1),
        "fields" => Structs(&[
            &[("name", Str("x")), ("offset", Int(0)), ("datatype", Int(1))],
            &[("name", Str("y")), ("offset", Int(1)), ("datatype", Int(1))],
            &[("name", Str("z")), ("offset", Int(2)), ("datatype", Int(1))],
        ]),
        "is_bigendian" => Bool(false),
        "point_step" => Int(3),
        "row_step" => Int(3),
        "data" => Ints(&[10, 20, 30]),
        "is_dense" => Bool(true),
    ),
    rule!(
        "sensor_msgs/msg/JointState",
        "name" => Strs(&["joint1", "joint2", "joint3"]),
        "position" => Floats(&[0.1, 0.2, 0.3]),
        "velocity" => Floats(&[0.01, 0.02, 0.03]),
        "effort" => Floats(&[1.0, 2.0, 3.0]),
    ),
    rule!(
        "sensor_msgs/msg/Imu",
        "orientation_covariance" => Fill(0.1),
        "angular_velocity" => Struct(xyz!(0.01, 0.02, 0.03)),
        "angular_velocity_covariance" => Fill(0.01),
        "linear_acceleration" => Struct(xyz!(0.1, 0.2, 9.8)),
        "linear_acceleration_covariance" => Fill(0.1),
    ),
    rule!(
        "sensor_msgs/msg/Range",
        "radiation_type" => Int(0),
        "field_of_view" => Float(0.1),
        "min_range" => Float(0.02),
        "max_range" => Float(2.0),
        "range" => Float(1.5),
    ),
    rule!("sensor_msgs/msg/Temperature", "temperature" => Float(25.5), "variance" => Float(0.1)),
    rule!("sensor_msgs/msg/FluidPressure", "fluid_pressure" => Float(101_325.0), "variance" => Float(100.0)),
    rule!("sensor_msgs/msg/Illuminance", "illuminance" => Float(500.0), "variance" => Float(10.0)),
    rule!(
        "sensor_msgs/msg/MagneticField",
        "magnetic_field" => Struct(xyz!(0.1, 0.2, 0.3)),
        "magnetic_field_covariance" => Fill(0.01),
    ),
    rule!(
        "sensor_msgs/msg/NavSatFix",
        "latitude" => Float(37.7749),
        "longitude" => Float(-122.4194),
        "altitude" => Float(100.0),
        "position_covariance" => Fill(1.0),
        "position_covariance_type" => Int(1),
    ),
    rule!(
        "sensor_msgs/msg/BatteryState",
        "voltage" => Float(12.6),
        "temperature" => Float(25.0),
        "current" => Float(-5.0),
        "charge" => Float(50.0),
        "capacity" => Float(100.0),
        "design_capacity" => Float(100.0),
        "percentage" => Float(0.5),
        "power_supply_status" => Int(2),
        "power_supply_health" => Int(1),
        "power_supply_technology" => Int(1),
        "present" => Bool(true),
        "cell_voltage" => Floats(&[3.7, 3.8, 3.6]),
        "cell_temperature" => Floats(&[25.0, 25.5, 24.5]),
        "location" => Str("battery_compartment"),
        "serial_number" => Str("BAT123456"),
    ),
    rule!(
        "sensor_msgs/msg/CameraInfo",
        "height" => Int(480),
        "width" => Int(640),
        "distortion_model" => Str("equidistant"),
        "d" => Floats(&[0.1, -0.2, 0.001, 0.002]),
        "k" => Floats(&[525.0, 0.0, 320.0, 0.0, 525.0, 240.0, 0.0, 0.0, 1.0]),
        "r" => Floats(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
        "p" => Floats(&[525.0, 0.0, 320.0, 0.0, 0.0, 525.0, 240.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
        "binning_x" => Int(1),
        "binning_y" => Int(1),
        "roi" => Struct(&[
            ("x_offset", Int(0)),
            ("y_offset", Int(0)),
            ("height", Int(0)),
            ("width", Int(0)),
            ("do_rectify", Bool(false)),
        ]),
    ),
    rule!(
        "sensor_msgs/msg/ChannelFloat32",
        "name" => Str("intensity"),
        "values" => Floats(&[100.0, 200.0, 300.0]),
    ),
    rule!(
        "sensor_msgs/msg/CompressedImage",
        "format" => Str("jpeg"),
        "data" => Ints(&[255, 216, 224, 16]),
    ),
    rule!(
        "sensor_msgs/msg/Joy",
        "axes" => Floats(&[0.0, 0.5, -0.3, 1.0]),
        "buttons" => Ints(&[1, 0]),
    ),
    rule!("sensor_msgs/msg/JoyFeedback", "type" => Int(1), "id" => Int(0), "intensity" => Float(0.8)),
    rule!(
        "sensor_msgs/msg/JoyFeedbackArray",
        "array" => Structs(&[
            &[("type", Int(1)), ("id", Int(0)), ("intensity", Float(0.8))],
            &[("type", Int(2)), ("id", Int(1)), ("intensity", Float(0.5))],
        ]),
    ),
    rule!("sensor_msgs/msg/LaserEcho", "echoes" => Floats(&[1.5, 2.0, 2.5])),
    rule!(
        "sensor_msgs/msg/MultiDOFJointState",
        "joint_names" => Strs(&["joint1", "joint2"]),
        "transforms" => Structs(&[
            &[("translation", Struct(xyz!(1.0, 0.0, 0.0)))],
            &[("translation", Struct(xyz!(0.0, 1.0, 0.0)))],
        ]),
        "twist" => Structs(&[
            &[("linear", Struct(xyz!(0.1, 0.0, 0.0))), ("angular", Struct(xyz!(0.0, 0.0, 0.01)))],
            &[("linear", Struct(xyz!(0.0, 0.1, 0.0))), ("angular", Struct(xyz!(0.0, 0.0, 0.01)))],
        ]),
        "wrench" => Structs(&[
            &[("force", Struct(xyz!(1.0, 0.0, 0.0))), ("torque", Struct(xyz!(0.0, 0.0, 0.1)))],
            &[("force", Struct(xyz!(0.0, 1.0, 0.0))), ("torque", Struct(xyz!(0.0, 0.0, 0.1)))],
        ]),
    ),
    rule!(
        "sensor_msgs/msg/MultiEchoLaserScan",
        "angle_min" => Float(-1.57),
        "angle_max" => Float(1.57),
        "angle_increment" => Float(0.1),
        "time_increment" => Float(0.001),
        "scan_time" => Float(0.1),
        "range_min" => Float(0.1),
        "range_max" => Float(10.0),
        "ranges" => Structs(&[
            &[("echoes", Floats(&[1.5, 2.0]))],
            &[("echoes", Floats(&[2.5, 3.0]))],
            &[("echoes", Floats(&[3.5, 4.0]))],
        ]),
        "intensities" => Structs(&[
            &[("echoes", Floats(&[100.0, 150.0]))],
            &[("echoes", Floats(&[200.0, 250.0]))],
            &[("echoes", Floats(&[300.0, 350.0]))],
        ]),
    ),
    rule!("sensor_msgs/msg/NavSatStatus", "status" => Int(0), "service" => Int(1)),
    rule!(
        "sensor_msgs/msg/PointField",
        "name" => Str("x"),
        "offset" => Int(0),
        "datatype" => Int(7),
        "count" => Int(1),
    ),
    rule!(
        "sensor_msgs/msg/RegionOfInterest",
        "x_offset" => Int(10),
        "y_offset" => Int(20),
        "height" => Int(100),
        "width" => Int(200),
        "do_rectify" => Bool(false),
    ),
    rule!("sensor_msgs/msg/RelativeHumidity", "relative_humidity" => Float(0.65), "variance" => Float(0.01)),
    rule!(
        "sensor_msgs/msg/TimeReference",
        "time_ref" => Struct(&[("sec", Int(1_234_567_890)), ("nanosec", Int(123_456_789))]),
        "source" => Str("gps"),
    ),
    // ── nav_msgs ───────────────────────────────────────────────
    rule!(
        "nav_msgs/msg/Odometry",
        "child_frame_id" => Str("base_link"),
        "pose" => Struct(&[("pose", Struct(&[("position", Struct(xyz!(1.0, 2.0, 0.0)))]))]),
        "twist" => Struct(&[("twist", Struct(&[("angular", Struct(xyz!(0.0, 0.0, 0.1)))]))]),
    ),
    rule!(
        "nav_msgs/msg/Path",
        "poses" => Structs(&[
            &[("pose", Struct(&[("position", Struct(xyz!(0.0, 0.0, 0.0)))]))],
            &[("pose", Struct(&[("position", Struct(xyz!(1.0, 1.0, 0.0)))]))],
        ]),
    ),
    rule!(
        "nav_msgs/msg/OccupancyGrid",
        "info" => Struct(&[("width", Int(2)), ("height", Int(2))]),
        "data" => Ints(&[-1, 0, 50, 100]),
    ),
    rule!(
        "nav_msgs/msg/GridCells",
        "cell_width" => Float(0.1),
        "cell_height" => Float(0.1),
        "cells" => Structs(&[xyz!(1.0, 1.0, 0.0), xyz!(2.0, 2.0, 0.0), xyz!(3.0, 3.0, 0.0)]),
    ),
    rule!(
        "nav_msgs/msg/MapMetaData",
        "map_load_time" => Struct(&[("sec", Int(0)), ("nanosec", Int(0))]),
        "resolution" => Float(0.05),
        "width" => Int(10),
        "height" => Int(10),
        "origin" => Struct(&[("position", Struct(xyz!(0.0, 0.0, 0.0)))]),
    ),
    // ── stereo_msgs / tf2_msgs ─────────────────────────────────
    rule!(
        "stereo_msgs/msg/DisparityImage",
        "image" => Struct(&[
            ("height", Int(1)),
            ("width", Int(1)),
            ("encoding", Str("32FC1")),
            ("is_bigendian", Int(0)),
            ("step", Int(4)),
            ("data", Ints(&[1, 2, 128, 63])),
        ]),
        "f" => Float(525.0),
        "t" => Float(0.1),
        "valid_window" => Struct(&[
            ("x_offset", Int(0)),
            ("y_offset", Int(0)),
            ("height", Int(1)),
            ("width", Int(1)),
            ("do_rectify", Bool(false)),
        ]),
        "min_disparity" => Float(0.0),
        "max_disparity" => Float(64.0),
        "delta_d" => Float(0.125),
    ),
    rule!("tf2_msgs/msg/TF2Error", "error" => Int(0), "error_string" => Str("No error")),
    rule!(
        "tf2_msgs/msg/TFMessage",
        "transforms" => Structs(&[
            NONE,
            &[
                ("child_frame_id", Str("sensor_frame")),
                ("transform", Struct(&[("translation", Struct(xyz!(0.5, 0.0, 0.2)))])),
            ],
        ]),
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::humble_registry;

    #[test]
    fn every_published_type_has_exactly_one_rule() {
        let registry = humble_registry().unwrap();
        let mut seen = HashSet::new();
        for rule in RULES {
            assert!(seen.insert(rule.type_name), "duplicate rule {}", rule.type_name);
            assert!(registry.contains(rule.type_name), "rule for unknown {}", rule.type_name);
        }
        for (name, _) in registry.published() {
            assert!(rule_for(name).is_some(), "{name} has no rule");
        }
    }

    #[test]
    fn rules_only_name_declared_fields() {
        let registry = humble_registry().unwrap();
        for rule in RULES {
            let desc = registry.lookup(rule.type_name).unwrap();
            for (field, _) in rule.fields {
                assert!(desc.field_index(field).is_some(), "{}.{field}", rule.type_name);
            }
        }
    }

    #[test]
    fn parent_rule_wins_over_child_rule() {
        let twist = rule_for("geometry_msgs/msg/Twist").unwrap();
        assert_eq!(find(twist.fields, "linear"), Some(Struct(xyz!(1.0, 0.0, 0.0))));
        let vector = rule_for("geometry_msgs/msg/Vector3").unwrap();
        assert_eq!(find(vector.fields, "x"), Some(Float(0.1)));
        assert_eq!(find(vector.fields, "w"), None);
    }
}
