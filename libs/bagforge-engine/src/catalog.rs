use bagforge_api::error::PluginError;
use bagforge_api::schema::{CatalogEntry, Registry};

macro_rules! published {
    ($name:literal, $topic:literal, $def:expr) => {
        CatalogEntry { name: $name, topic: Some($topic), definition: $def }
    };
}

macro_rules! nested {
    ($name:literal, $def:expr) => {
        CatalogEntry { name: $name, topic: None, definition: $def }
    };
}

const STAMP: &str = "int32 sec\nuint32 nanosec\n";
const XYZ64: &str = "float64 x\nfloat64 y\nfloat64 z\n";

/// ROS 2 Humble message shapes the fixture corpus publishes, in publish order,
/// followed by the nested-only `builtin_interfaces` types.
pub static CATALOG: &[CatalogEntry] = &[
    // ── geometry_msgs ──────────────────────────────────────────
    published!("geometry_msgs/msg/Accel", "/test/geometry_msgs/accel", "Vector3 linear\nVector3 angular\n"),
    published!(
        "geometry_msgs/msg/AccelStamped",
        "/test/geometry_msgs/accel_stamped",
        "std_msgs/Header header\nAccel accel\n"
    ),
    published!(
        "geometry_msgs/msg/AccelWithCovariance",
        "/test/geometry_msgs/accel_with_covariance",
        "Accel accel\nfloat64[36] covariance\n"
    ),
    published!(
        "geometry_msgs/msg/AccelWithCovarianceStamped",
        "/test/geometry_msgs/accel_with_covariance_stamped",
        "std_msgs/Header header\nAccelWithCovariance accel\n"
    ),
    published!(
        "geometry_msgs/msg/Inertia",
        "/test/geometry_msgs/inertia",
        "float64 m\nVector3 com\nfloat64 ixx\nfloat64 ixy\nfloat64 ixz\nfloat64 iyy\nfloat64 iyz\nfloat64 izz\n"
    ),
    published!(
        "geometry_msgs/msg/InertiaStamped",
        "/test/geometry_msgs/inertia_stamped",
        "std_msgs/Header header\nInertia inertia\n"
    ),
    published!("geometry_msgs/msg/Point", "/test/geometry_msgs/point", XYZ64),
    published!("geometry_msgs/msg/Point32", "/test/geometry_msgs/point32", "float32 x\nfloat32 y\nfloat32 z\n"),
    published!(
        "geometry_msgs/msg/PointStamped",
        "/test/geometry_msgs/point_stamped",
        "std_msgs/Header header\nPoint point\n"
    ),
    published!("geometry_msgs/msg/Polygon", "/test/geometry_msgs/polygon", "Point32[] points\n"),
    published!(
        "geometry_msgs/msg/PolygonStamped",
        "/test/geometry_msgs/polygon_stamped",
        "std_msgs/Header header\nPolygon polygon\n"
    ),
    published!("geometry_msgs/msg/Pose", "/test/geometry_msgs/pose", "Point position\nQuaternion orientation\n"),
    published!("geometry_msgs/msg/Pose2D", "/test/geometry_msgs/pose2d", "float64 x\nfloat64 y\nfloat64 theta\n"),
    published!(
        "geometry_msgs/msg/PoseArray",
        "/test/geometry_msgs/pose_array",
        "std_msgs/Header header\nPose[] poses\n"
    ),
    published!(
        "geometry_msgs/msg/PoseStamped",
        "/test/geometry_msgs/pose_stamped",
        "std_msgs/Header header\nPose pose\n"
    ),
    published!(
        "geometry_msgs/msg/PoseWithCovariance",
        "/test/geometry_msgs/pose_with_covariance",
        "Pose pose\nfloat64[36] covariance\n"
    ),
    published!(
        "geometry_msgs/msg/PoseWithCovarianceStamped",
        "/test/geometry_msgs/pose_with_covariance_stamped",
        "std_msgs/Header header\nPoseWithCovariance pose\n"
    ),
    published!(
        "geometry_msgs/msg/Quaternion",
        "/test/geometry_msgs/quaternion",
        "float64 x 0\nfloat64 y 0\nfloat64 z 0\nfloat64 w 1\n"
    ),
    published!(
        "geometry_msgs/msg/QuaternionStamped",
        "/test/geometry_msgs/quaternion_stamped",
        "std_msgs/Header header\nQuaternion quaternion\n"
    ),
    published!(
        "geometry_msgs/msg/Transform",
        "/test/geometry_msgs/transform",
        "Vector3 translation\nQuaternion rotation\n"
    ),
    published!(
        "geometry_msgs/msg/TransformStamped",
        "/test/geometry_msgs/transform_stamped",
        "std_msgs/Header header\nstring child_frame_id\nTransform transform\n"
    ),
    published!("geometry_msgs/msg/Twist", "/test/geometry_msgs/twist", "Vector3 linear\nVector3 angular\n"),
    published!(
        "geometry_msgs/msg/TwistStamped",
        "/test/geometry_msgs/twist_stamped",
        "std_msgs/Header header\nTwist twist\n"
    ),
    published!(
        "geometry_msgs/msg/TwistWithCovariance",
        "/test/geometry_msgs/twist_with_covariance",
        "Twist twist\nfloat64[36] covariance\n"
    ),
    published!(
        "geometry_msgs/msg/TwistWithCovarianceStamped",
        "/test/geometry_msgs/twist_with_covariance_stamped",
        "std_msgs/Header header\nTwistWithCovariance twist\n"
    ),
    published!("geometry_msgs/msg/Vector3", "/test/geometry_msgs/vector3", XYZ64),
    published!(
        "geometry_msgs/msg/Vector3Stamped",
        "/test/geometry_msgs/vector3_stamped",
        "std_msgs/Header header\nVector3 vector\n"
    ),
    published!("geometry_msgs/msg/Wrench", "/test/geometry_msgs/wrench", "Vector3 force\nVector3 torque\n"),
    published!(
        "geometry_msgs/msg/WrenchStamped",
        "/test/geometry_msgs/wrench_stamped",
        "std_msgs/Header header\nWrench wrench\n"
    ),
    // ── nav_msgs ───────────────────────────────────────────────
    published!(
        "nav_msgs/msg/GridCells",
        "/test/nav_msgs/grid_cells",
        "std_msgs/Header header\nfloat32 cell_width\nfloat32 cell_height\ngeometry_msgs/Point[] cells\n"
    ),
    published!(
        "nav_msgs/msg/MapMetaData",
        "/test/nav_msgs/map_metadata",
        "builtin_interfaces/Time map_load_time\nfloat32 resolution\nuint32 width\nuint32 height\ngeometry_msgs/Pose origin\n"
    ),
    published!(
        "nav_msgs/msg/OccupancyGrid",
        "/test/nav_msgs/occupancy_grid",
        "std_msgs/Header header\nMapMetaData info\nint8[] data\n"
    ),
    published!(
        "nav_msgs/msg/Odometry",
        "/test/nav_msgs/odometry",
        "std_msgs/Header header\nstring child_frame_id\ngeometry_msgs/PoseWithCovariance pose\ngeometry_msgs/TwistWithCovariance twist\n"
    ),
    published!(
        "nav_msgs/msg/Path",
        "/test/nav_msgs/path",
        "std_msgs/Header header\ngeometry_msgs/PoseStamped[] poses\n"
    ),
    // ── sensor_msgs ────────────────────────────────────────────
    published!(
        "sensor_msgs/msg/BatteryState",
        "/test/sensor_msgs/battery_state",
        "uint8 POWER_SUPPLY_STATUS_UNKNOWN=0
uint8 POWER_SUPPLY_STATUS_CHARGING=1
uint8 POWER_SUPPLY_STATUS_DISCHARGING=2
uint8 POWER_SUPPLY_STATUS_NOT_CHARGING=3
uint8 POWER_SUPPLY_STATUS_FULL=4
uint8 POWER_SUPPLY_HEALTH_UNKNOWN=0
uint8 POWER_SUPPLY_HEALTH_GOOD=1
uint8 POWER_SUPPLY_HEALTH_OVERHEAT=2
uint8 POWER_SUPPLY_HEALTH_DEAD=3
uint8 POWER_SUPPLY_HEALTH_OVERVOLTAGE=4
uint8 POWER_SUPPLY_HEALTH_UNSPEC_FAILURE=5
uint8 POWER_SUPPLY_HEALTH_COLD=6
uint8 POWER_SUPPLY_HEALTH_WATCHDOG_TIMER_EXPIRE=7
uint8 POWER_SUPPLY_HEALTH_SAFETY_TIMER_EXPIRE=8
uint8 POWER_SUPPLY_TECHNOLOGY_UNKNOWN=0
uint8 POWER_SUPPLY_TECHNOLOGY_NIMH=1
uint8 POWER_SUPPLY_TECHNOLOGY_LION=2
uint8 POWER_SUPPLY_TECHNOLOGY_LIPO=3
uint8 POWER_SUPPLY_TECHNOLOGY_LIFE=4
uint8 POWER_SUPPLY_TECHNOLOGY_NICD=5
uint8 POWER_SUPPLY_TECHNOLOGY_LIMN=6
std_msgs/Header header
float32 voltage
float32 temperature
float32 current
float32 charge
float32 capacity
float32 design_capacity
float32 percentage
uint8 power_supply_status
uint8 power_supply_health
uint8 power_supply_technology
bool present
float32[] cell_voltage
float32[] cell_temperature
string location
string serial_number
"
    ),
    published!(
        "sensor_msgs/msg/CameraInfo",
        "/test/sensor_msgs/camera_info",
        "std_msgs/Header header
uint32 height
uint32 width
string distortion_model
float64[] d
float64[9] k
float64[9] r
float64[12] p
uint32 binning_x
uint32 binning_y
RegionOfInterest roi
"
    ),
    published!(
        "sensor_msgs/msg/ChannelFloat32",
        "/test/sensor_msgs/channel_float32",
        "string name\nfloat32[] values\n"
    ),
    published!(
        "sensor_msgs/msg/CompressedImage",
        "/test/sensor_msgs/compressed_image",
        "std_msgs/Header header\nstring format\nuint8[] data\n"
    ),
    published!(
        "sensor_msgs/msg/FluidPressure",
        "/test/sensor_msgs/fluid_pressure",
        "std_msgs/Header header\nfloat64 fluid_pressure\nfloat64 variance\n"
    ),
    published!(
        "sensor_msgs/msg/Illuminance",
        "/test/sensor_msgs/illuminance",
        "std_msgs/Header header\nfloat64 illuminance\nfloat64 variance\n"
    ),
    published!(
        "sensor_msgs/msg/Image",
        "/test/sensor_msgs/image",
        "std_msgs/Header header
uint32 height
uint32 width
string encoding
uint8 is_bigendian
uint32 step
uint8[] data
"
    ),
    published!(
        "sensor_msgs/msg/Imu",
        "/test/sensor_msgs/imu",
        "std_msgs/Header header
geometry_msgs/Quaternion orientation
float64[9] orientation_covariance
geometry_msgs/Vector3 angular_velocity
float64[9] angular_velocity_covariance
geometry_msgs/Vector3 linear_acceleration
float64[9] linear_acceleration_covariance
"
    ),
    published!(
        "sensor_msgs/msg/JointState",
        "/test/sensor_msgs/joint_state",
        "std_msgs/Header header\nstring[] name\nfloat64[] position\nfloat64[] velocity\nfloat64[] effort\n"
    ),
    published!(
        "sensor_msgs/msg/Joy",
        "/test/sensor_msgs/joy",
        "std_msgs/Header header\nfloat32[] axes\nint32[] buttons\n"
    ),
    published!(
        "sensor_msgs/msg/JoyFeedback",
        "/test/sensor_msgs/joy_feedback",
        "uint8 TYPE_LED=0\nuint8 TYPE_RUMBLE=1\nuint8 TYPE_BUZZER=2\nuint8 type\nuint8 id\nfloat32 intensity\n"
    ),
    published!(
        "sensor_msgs/msg/JoyFeedbackArray",
        "/test/sensor_msgs/joy_feedback_array",
        "JoyFeedback[] array\n"
    ),
    published!("sensor_msgs/msg/LaserEcho", "/test/sensor_msgs/laser_echo", "float32[] echoes\n"),
    published!(
        "sensor_msgs/msg/LaserScan",
        "/test/sensor_msgs/laser_scan",
        "std_msgs/Header header
float32 angle_min
float32 angle_max
float32 angle_increment
float32 time_increment
float32 scan_time
float32 range_min
float32 range_max
float32[] ranges
float32[] intensities
"
    ),
    published!(
        "sensor_msgs/msg/MagneticField",
        "/test/sensor_msgs/magnetic_field",
        "std_msgs/Header header\ngeometry_msgs/Vector3 magnetic_field\nfloat64[9] magnetic_field_covariance\n"
    ),
    published!(
        "sensor_msgs/msg/MultiDOFJointState",
        "/test/sensor_msgs/multi_dof_joint_state",
        "std_msgs/Header header
string[] joint_names
geometry_msgs/Transform[] transforms
geometry_msgs/Twist[] twist
geometry_msgs/Wrench[] wrench
"
    ),
    published!(
        "sensor_msgs/msg/MultiEchoLaserScan",
        "/test/sensor_msgs/multi_echo_laser_scan",
        "std_msgs/Header header
float32 angle_min
float32 angle_max
float32 angle_increment
float32 time_increment
float32 scan_time
float32 range_min
float32 range_max
LaserEcho[] ranges
LaserEcho[] intensities
"
    ),
    published!(
        "sensor_msgs/msg/NavSatFix",
        "/test/sensor_msgs/nav_sat_fix",
        "uint8 COVARIANCE_TYPE_UNKNOWN=0
uint8 COVARIANCE_TYPE_APPROXIMATED=1
uint8 COVARIANCE_TYPE_DIAGONAL_KNOWN=2
uint8 COVARIANCE_TYPE_KNOWN=3
std_msgs/Header header
NavSatStatus status
float64 latitude
float64 longitude
float64 altitude
float64[9] position_covariance
uint8 position_covariance_type
"
    ),
    published!(
        "sensor_msgs/msg/NavSatStatus",
        "/test/sensor_msgs/nav_sat_status",
        "int8 STATUS_NO_FIX=-1
int8 STATUS_FIX=0
int8 STATUS_SBAS_FIX=1
int8 STATUS_GBAS_FIX=2
int8 status
uint16 SERVICE_GPS=1
uint16 SERVICE_GLONASS=2
uint16 SERVICE_COMPASS=4
uint16 SERVICE_GALILEO=8
uint16 service
"
    ),
    published!(
        "sensor_msgs/msg/PointCloud",
        "/test/sensor_msgs/point_cloud",
        "std_msgs/Header header\ngeometry_msgs/Point32[] points\nChannelFloat32[] channels\n"
    ),
    published!(
        "sensor_msgs/msg/PointCloud2",
        "/test/sensor_msgs/point_cloud2",
        "std_msgs/Header header
uint32 height
uint32 width
PointField[] fields
bool is_bigendian
uint32 point_step
uint32 row_step
uint8[] data
bool is_dense
"
    ),
    published!(
        "sensor_msgs/msg/PointField",
        "/test/sensor_msgs/point_field",
        "uint8 INT8=1
uint8 UINT8=2
uint8 INT16=3
uint8 UINT16=4
uint8 INT32=5
uint8 UINT32=6
uint8 FLOAT32=7
uint8 FLOAT64=8
string name
uint32 offset
uint8 datatype
uint32 count
"
    ),
    published!(
        "sensor_msgs/msg/Range",
        "/test/sensor_msgs/range",
        "uint8 ULTRASOUND=0
uint8 INFRARED=1
std_msgs/Header header
uint8 radiation_type
float32 field_of_view
float32 min_range
float32 max_range
float32 range
"
    ),
    published!(
        "sensor_msgs/msg/RegionOfInterest",
        "/test/sensor_msgs/region_of_interest",
        "uint32 x_offset\nuint32 y_offset\nuint32 height\nuint32 width\nbool do_rectify\n"
    ),
    published!(
        "sensor_msgs/msg/RelativeHumidity",
        "/test/sensor_msgs/relative_humidity",
        "std_msgs/Header header\nfloat64 relative_humidity\nfloat64 variance\n"
    ),
    published!(
        "sensor_msgs/msg/Temperature",
        "/test/sensor_msgs/temperature",
        "std_msgs/Header header\nfloat64 temperature\nfloat64 variance\n"
    ),
    published!(
        "sensor_msgs/msg/TimeReference",
        "/test/sensor_msgs/time_reference",
        "std_msgs/Header header\nbuiltin_interfaces/Time time_ref\nstring source\n"
    ),
    // ── std_msgs ───────────────────────────────────────────────
    published!("std_msgs/msg/Bool", "/test/std_msgs/bool", "bool data\n"),
    published!("std_msgs/msg/Byte", "/test/std_msgs/byte", "byte data\n"),
    published!(
        "std_msgs/msg/ByteMultiArray",
        "/test/std_msgs/byte_multi_array",
        "MultiArrayLayout layout\nbyte[] data\n"
    ),
    published!("std_msgs/msg/Char", "/test/std_msgs/char", "char data\n"),
    published!(
        "std_msgs/msg/ColorRGBA",
        "/test/std_msgs/color_rgba",
        "float32 r\nfloat32 g\nfloat32 b\nfloat32 a\n"
    ),
    published!("std_msgs/msg/Empty", "/test/std_msgs/empty", ""),
    published!("std_msgs/msg/Float32", "/test/std_msgs/float32", "float32 data\n"),
    published!(
        "std_msgs/msg/Float32MultiArray",
        "/test/std_msgs/float32_multi_array",
        "MultiArrayLayout layout\nfloat32[] data\n"
    ),
    published!("std_msgs/msg/Float64", "/test/std_msgs/float64", "float64 data\n"),
    published!(
        "std_msgs/msg/Float64MultiArray",
        "/test/std_msgs/float64_multi_array",
        "MultiArrayLayout layout\nfloat64[] data\n"
    ),
    published!(
        "std_msgs/msg/Header",
        "/test/std_msgs/header",
        "builtin_interfaces/Time stamp\nstring frame_id\n"
    ),
    published!("std_msgs/msg/Int16", "/test/std_msgs/int16", "int16 data\n"),
    published!(
        "std_msgs/msg/Int16MultiArray",
        "/test/std_msgs/int16_multi_array",
        "MultiArrayLayout layout\nint16[] data\n"
    ),
    published!("std_msgs/msg/Int32", "/test/std_msgs/int32", "int32 data\n"),
    published!(
        "std_msgs/msg/Int32MultiArray",
        "/test/std_msgs/int32_multi_array",
        "MultiArrayLayout layout\nint32[] data\n"
    ),
    published!("std_msgs/msg/Int64", "/test/std_msgs/int64", "int64 data\n"),
    published!(
        "std_msgs/msg/Int64MultiArray",
        "/test/std_msgs/int64_multi_array",
        "MultiArrayLayout layout\nint64[] data\n"
    ),
    published!("std_msgs/msg/Int8", "/test/std_msgs/int8", "int8 data\n"),
    published!(
        "std_msgs/msg/Int8MultiArray",
        "/test/std_msgs/int8_multi_array",
        "MultiArrayLayout layout\nint8[] data\n"
    ),
    published!(
        "std_msgs/msg/MultiArrayDimension",
        "/test/std_msgs/multi_array_dimension",
        "string label\nuint32 size\nuint32 stride\n"
    ),
    published!(
        "std_msgs/msg/MultiArrayLayout",
        "/test/std_msgs/multi_array_layout",
        "MultiArrayDimension[] dim\nuint32 data_offset\n"
    ),
    published!("std_msgs/msg/String", "/test/std_msgs/string", "string data\n"),
    published!("std_msgs/msg/UInt16", "/test/std_msgs/uint16", "uint16 data\n"),
    published!(
        "std_msgs/msg/UInt16MultiArray",
        "/test/std_msgs/uint16_multi_array",
        "MultiArrayLayout layout\nuint16[] data\n"
    ),
    published!("std_msgs/msg/UInt32", "/test/std_msgs/uint32", "uint32 data\n"),
    published!(
        "std_msgs/msg/UInt32MultiArray",
        "/test/std_msgs/uint32_multi_array",
        "MultiArrayLayout layout\nuint32[] data\n"
    ),
    published!("std_msgs/msg/UInt64", "/test/std_msgs/uint64", "uint64 data\n"),
    published!(
        "std_msgs/msg/UInt64MultiArray",
        "/test/std_msgs/uint64_multi_array",
        "MultiArrayLayout layout\nuint64[] data\n"
    ),
    published!("std_msgs/msg/UInt8", "/test/std_msgs/uint8", "uint8 data\n"),
    published!(
        "std_msgs/msg/UInt8MultiArray",
        "/test/std_msgs/uint8_multi_array",
        "MultiArrayLayout layout\nuint8[] data\n"
    ),
    // ── stereo_msgs ────────────────────────────────────────────
    published!(
        "stereo_msgs/msg/DisparityImage",
        "/test/stereo_msgs/disparity_image",
        "std_msgs/Header header
sensor_msgs/Image image
float32 f
float32 t
sensor_msgs/RegionOfInterest valid_window
float32 min_disparity
float32 max_disparity
float32 delta_d
"
    ),
    // ── tf2_msgs ───────────────────────────────────────────────
    published!(
        "tf2_msgs/msg/TF2Error",
        "/test/tf2_msgs/tf2_error",
        "uint8 NO_ERROR=0
uint8 LOOKUP_ERROR=1
uint8 CONNECTIVITY_ERROR=2
uint8 EXTRAPOLATION_ERROR=3
uint8 INVALID_ARGUMENT_ERROR=4
uint8 TIMEOUT_ERROR=5
uint8 TRANSFORM_ERROR=6
uint8 error
string error_string
"
    ),
    published!(
        "tf2_msgs/msg/TFMessage",
        "/test/tf2_msgs/tf_message",
        "geometry_msgs/TransformStamped[] transforms\n"
    ),
    // ── builtin_interfaces ─────────────────────────────────────
    nested!("builtin_interfaces/msg/Time", STAMP),
    nested!("builtin_interfaces/msg/Duration", STAMP),
];

/// Registry over [`CATALOG`].
pub fn humble_registry() -> Result<Registry, PluginError> {
    Registry::from_catalog(CATALOG)
}

#[cfg(test)]
mod tests {
    use bagforge_api::schema::{Arity, FieldKind, Primitive};

    use super::*;

    #[test]
    fn catalog_parses_and_publishes_every_message_type() {
        let registry = humble_registry().unwrap();
        assert_eq!(registry.len(), 96);
        assert_eq!(registry.published().len(), 94);
        assert!(!registry.published().iter().any(|(name, _)| name.starts_with("builtin_interfaces")));
    }

    #[test]
    fn topics_follow_snake_case_convention() {
        let registry = humble_registry().unwrap();
        let topics: Vec<_> = registry.published().into_iter().map(|(_, t)| t).collect();
        assert!(topics.contains(&"/test/geometry_msgs/accel_with_covariance_stamped"));
        assert!(topics.contains(&"/test/geometry_msgs/pose2d"));
        assert!(topics.contains(&"/test/sensor_msgs/point_cloud2"));
        assert!(topics.contains(&"/test/nav_msgs/map_metadata"));
    }

    #[test]
    fn shapes_keep_width_signedness_and_cardinality() {
        let registry = humble_registry().unwrap();

        let status = registry.lookup("sensor_msgs/msg/NavSatStatus").unwrap();
        assert_eq!(status.fields[0].kind, FieldKind::Primitive(Primitive::Int8));
        assert_eq!(status.fields[1].kind, FieldKind::Primitive(Primitive::UInt16));
        assert_eq!(status.constants.len(), 8);
        assert_eq!(status.constants[0].value, "-1");

        let info = registry.lookup("sensor_msgs/msg/CameraInfo").unwrap();
        let arities: Vec<_> = info.fields[4..8].iter().map(|f| f.arity).collect();
        assert_eq!(arities, [Arity::Sequence, Arity::Array(9), Arity::Array(9), Arity::Array(12)]);

        let grid = registry.lookup("nav_msgs/msg/OccupancyGrid").unwrap();
        assert_eq!(grid.fields[1].kind, FieldKind::Nested("nav_msgs/msg/MapMetaData".into()));

        let quat = registry.lookup("geometry_msgs/msg/Quaternion").unwrap();
        assert_eq!(quat.fields[3].default.as_deref(), Some("1"));
    }

    #[test]
    fn odometry_definition_lists_each_dependency_once() {
        let registry = humble_registry().unwrap();
        let text = registry.message_definition("nav_msgs/msg/Odometry").unwrap();
        assert!(text.starts_with("std_msgs/Header header\n"));
        for dep in [
            "std_msgs/Header",
            "builtin_interfaces/Time",
            "geometry_msgs/PoseWithCovariance",
            "geometry_msgs/Pose",
            "geometry_msgs/Point",
            "geometry_msgs/Quaternion",
            "geometry_msgs/TwistWithCovariance",
            "geometry_msgs/Twist",
            "geometry_msgs/Vector3",
        ] {
            assert_eq!(text.matches(&format!("MSG: {dep}\n")).count(), 1, "{dep}");
        }
    }
}
