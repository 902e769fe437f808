//! Service topology expansion.
//!
//! Expands validated simulation parameters into the ordered list of
//! service descriptors that make up one run: the Gazebo engine first,
//! then one robot service per requested robot in ascending index order,
//! then the fixed auxiliary services. Downstream consumers rely on that
//! order for naming and position slicing.

use crate::params::SimParams;
use serde::{Deserialize, Serialize};

/// Exploration strategy used when the caller does not name one.
pub const DEFAULT_EXPLORE_STRATEGY: &str = "frontier";

/// Auxiliary services appended to every topology (vision + exploration).
pub const AUXILIARY_COUNT: usize = 2;

const ROS_SETUP: &str = "source /opt/ros/humble/setup.bash";
const WORKSPACE_SETUP: &str = "source /ros2_ws/install/setup.bash";
const HOLD_OPEN: &str = "tail -f /dev/null";

/// One service entry in the generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Manifest key; unique within one topology.
    pub service_name: String,

    /// Human-facing container instance name.
    pub container_name: String,

    /// Container image reference, opaque to this crate.
    pub image: String,

    /// Launch statements, executed inside the container as a single
    /// shell invocation in the order given.
    pub command: Vec<String>,

    /// Entrypoint override; absent unless a service explicitly needs one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,
}

impl ServiceDescriptor {
    fn new(
        service_name: impl Into<String>,
        container_name: impl Into<String>,
        image: impl Into<String>,
        command: Vec<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            container_name: container_name.into(),
            image: image.into(),
            command,
            entrypoint: None,
        }
    }
}

/// Expand validated parameters into the ordered service topology.
///
/// Callers must validate first; positions are sliced by robot index
/// here. `robot_count == 0` yields engine + auxiliaries only.
pub fn build_topology(params: &SimParams) -> Vec<ServiceDescriptor> {
    let mut services = Vec::with_capacity(params.robot_count + 1 + AUXILIARY_COUNT);

    services.push(ServiceDescriptor::new(
        "gazebo_node",
        "gz_server",
        "thdhyan/gz_server:latest",
        vec![
            ROS_SETUP.to_string(),
            WORKSPACE_SETUP.to_string(),
            format!("ros2 launch gazebo_node gazebo.launch.py {}", params.world),
            HOLD_OPEN.to_string(),
        ],
    ));

    for i in 0..params.robot_count {
        let pose = params.pose(i);
        services.push(ServiceDescriptor::new(
            format!("robot_{i}"),
            format!("robot_{i}"),
            "thdhyan/robot_node:latest",
            vec![
                ROS_SETUP.to_string(),
                WORKSPACE_SETUP.to_string(),
                format!(
                    "ros2 launch robot_node robot.launch.py x:={} y:={} z:={} rviz:={}",
                    pose.x, pose.y, pose.z, params.options.rviz
                ),
                HOLD_OPEN.to_string(),
            ],
        ));
    }

    services.push(ServiceDescriptor::new(
        "vision_node",
        "vision_server",
        "thdhyan/vision_node:latest",
        vec![
            ROS_SETUP.to_string(),
            WORKSPACE_SETUP.to_string(),
            "ros2 launch vision_node vision.launch.py".to_string(),
            HOLD_OPEN.to_string(),
        ],
    ));

    let strategy = params
        .options
        .explore_strategy
        .as_deref()
        .unwrap_or(DEFAULT_EXPLORE_STRATEGY);
    services.push(ServiceDescriptor::new(
        "explore_node",
        "explore_server",
        "thdhyan/explore_node:latest",
        vec![
            ROS_SETUP.to_string(),
            WORKSPACE_SETUP.to_string(),
            format!("ros2 launch explore_node explore.launch.py strategy:={strategy}"),
            HOLD_OPEN.to_string(),
        ],
    ));

    services
}
