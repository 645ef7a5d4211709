//! Scene entry point for pick queries.

use glam::{DAffine3, DVec3};

use scenepick_core::{NodeId, PickRay, PickResult, Result, SceneOptions, ScenePickError};

use crate::camera::Camera;
use crate::chooser::PickResultChooser;
use crate::graph::{NodeKind, SceneGraph};
use crate::traversal::Traversal;

/// A scene graph with a root, an optional camera and a viewport.
#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: SceneGraph,
    root: NodeId,
    camera: Option<NodeId>,
    options: SceneOptions,
}

impl Scene {
    /// Creates a scene rendering `root` into the viewport described by `options`.
    pub fn new(graph: SceneGraph, root: NodeId, options: SceneOptions) -> Result<Self> {
        graph.get(root)?;
        if !options.has_valid_viewport() {
            log::warn!(
                "scene viewport {}x{} is not valid; picks will miss",
                options.width,
                options.height
            );
        }
        log::info!(
            "scene with {} nodes, viewport {}x{}, depth buffer {}",
            graph.len(),
            options.width,
            options.height,
            if options.depth_buffer { "on" } else { "off" }
        );
        Ok(Self {
            graph,
            root,
            camera: None,
            options,
        })
    }

    /// Uses the camera node `camera` for picking.
    pub fn with_camera(mut self, camera: NodeId) -> Result<Self> {
        self.set_camera(Some(camera))?;
        Ok(self)
    }

    /// Sets or clears the camera node. Without one a default parallel camera is used.
    pub fn set_camera(&mut self, camera: Option<NodeId>) -> Result<()> {
        if let Some(id) = camera {
            if !matches!(self.graph.get(id)?.kind, NodeKind::Camera(_)) {
                return Err(ScenePickError::InvalidGeometry(format!(
                    "{id} is not a camera node"
                )));
            }
        }
        self.camera = camera;
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn camera(&self) -> Option<NodeId> {
        self.camera
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SceneOptions {
        &mut self.options
    }

    /// The pick ray through viewport pixel `(x, y)` in scene coordinates.
    pub fn camera_ray(&self, x: f64, y: f64) -> Option<PickRay> {
        let (width, height) = (self.options.width, self.options.height);
        match self.camera {
            Some(id) => match self.graph.node(id).map(|n| &n.kind) {
                Some(NodeKind::Camera(camera)) => {
                    camera.pick_ray(x, y, width, height, &self.graph.local_to_scene(id))
                }
                _ => None,
            },
            None => Camera::default().pick_ray(x, y, width, height, &DAffine3::IDENTITY),
        }
    }

    /// Picks the node under viewport pixel `(x, y)`.
    ///
    /// A miss reports the point where the pick ray meets the `z = 0` plane,
    /// or the near clip if that plane is behind it.
    pub fn pick(&self, x: f64, y: f64) -> PickResult {
        let Some(ray) = self.camera_ray(x, y) else {
            log::debug!("no pick ray at ({x}, {y})");
            return PickResult::miss(DVec3::new(x, y, 0.0), 0.0);
        };
        let mut chooser = PickResultChooser::new();
        Traversal::new(&self.graph).pick(self.root, &ray, self.options.depth_buffer, &mut chooser);
        let result = chooser.into_result(miss_result(&ray));
        log::trace!("pick ({x}, {y}) -> {:?}", result.node);
        result
    }
}

fn miss_result(ray: &PickRay) -> PickResult {
    let t = ray
        .plane_z0_t()
        .filter(|&t| t >= ray.near_t)
        .unwrap_or(ray.near_t);
    PickResult::miss(ray.at(t), ray.distance(t))
}
