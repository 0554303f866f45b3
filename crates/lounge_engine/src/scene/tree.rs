//! In-memory scene tree
//!
//! A minimal DOM-like host: nodes with tag, id, classes, attached component
//! names, a local transform, and optional geometry/material. Every change is
//! published on the tree's [`MutationBus`].

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::ecs::{component_name_matches, Entity};
use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use super::aabb::AABB;
use super::mutation::{MutationBus, SceneMutation};
use super::selector::Selector;
use super::SceneError;

/// Tag of the scene root
pub const SCENE_TAG: &str = "a-scene";
/// Tag of a plain entity
pub const ENTITY_TAG: &str = "a-entity";
/// Tag of a box primitive
pub const BOX_TAG: &str = "a-box";
/// Tag of a plane primitive
pub const PLANE_TAG: &str = "a-plane";

/// Renderable shape of a node, in local units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Box centered on the origin
    Box {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
        /// Size along Z
        depth: f32,
    },
    /// Plane in the local XY plane, facing +Z
    Plane {
        /// Size along X
        width: f32,
        /// Size along Y
        height: f32,
    },
}

impl Geometry {
    /// Local-space bounds of the shape
    pub fn local_bounds(&self) -> AABB {
        let extents = match *self {
            Self::Box { width, height, depth } => Vec3::new(width, height, depth) * 0.5,
            Self::Plane { width, height } => Vec3::new(width * 0.5, height * 0.5, 0.0),
        };
        AABB::from_center_extents(Vec3::zeros(), extents)
    }
}

/// Which faces of a surface are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Front face only
    #[default]
    Front,
    /// Both faces
    Double,
}

/// Surface appearance of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// CSS-style color such as `#808080`
    pub color: Option<String>,
    /// Texture asset reference
    pub texture: Option<String>,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether blending is enabled
    pub transparent: bool,
    /// Draw edges only
    pub wireframe: bool,
    /// Drawn faces
    pub side: Side,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: None,
            texture: None,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            side: Side::Front,
        }
    }
}

impl Material {
    /// Opaque material of the given color
    pub fn colored(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }
}

/// A node in the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    tag: String,
    element_id: Option<String>,
    classes: Vec<String>,
    components: Vec<String>,
    transform: Transform,
    geometry: Option<Geometry>,
    material: Option<Material>,
    parent: Option<Entity>,
    children: Vec<Entity>,
}

impl SceneNode {
    /// Create a detached node with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            element_id: None,
            classes: Vec::new(),
            components: Vec::new(),
            transform: Transform::identity(),
            geometry: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Plain `a-entity` node
    pub fn entity() -> Self {
        Self::new(ENTITY_TAG)
    }

    /// Builder pattern: set element id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.element_id = Some(id.into());
        self
    }

    /// Builder pattern: add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder pattern: declare a component attribute before the component
    /// itself is attached, so selectors and ancestor lookups see it early
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.components.contains(&name) {
            self.components.push(name);
        }
        self
    }

    /// Builder pattern: set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: set the local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder pattern: set geometry
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Builder pattern: set material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Element id, if any
    pub fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    /// Classes
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check for a class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Names of attached components
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Check for an attached component; `lounge-wall` also matches `lounge-wall__north`
    pub fn has_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| component_name_matches(c, name))
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Geometry, if any
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    /// Material, if any
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Parent node; `None` only for the root
    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[Entity] {
        &self.children
    }
}

/// Scene tree with a fixed root node
#[derive(Debug)]
pub struct SceneTree {
    nodes: SlotMap<Entity, SceneNode>,
    root: Entity,
    bus: MutationBus,
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree {
    /// Create a tree holding only the root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(SCENE_TAG));
        Self {
            nodes,
            root,
            bus: MutationBus::new(),
        }
    }

    /// The root node
    pub fn root(&self) -> Entity {
        self.root
    }

    /// Mutation notifications for this tree
    pub fn bus(&self) -> &MutationBus {
        &self.bus
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Check whether a node exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(entity)
    }

    /// Look up a node
    pub fn node(&self, entity: Entity) -> Result<&SceneNode, SceneError> {
        self.nodes.get(entity).ok_or(SceneError::UnknownEntity(entity))
    }

    fn node_mut(&mut self, entity: Entity) -> Result<&mut SceneNode, SceneError> {
        self.nodes.get_mut(entity).ok_or(SceneError::UnknownEntity(entity))
    }

    /// Insert `node` as the last child of `parent`
    pub fn spawn(&mut self, parent: Entity, mut node: SceneNode) -> Result<Entity, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownEntity(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let has_geometry = node.geometry.is_some();

        let child = self.nodes.insert(node);
        self.node_mut(parent)?.children.push(child);

        self.bus.publish(&SceneMutation::ChildAdded { parent, child });
        if has_geometry {
            self.bus.publish(&SceneMutation::Object3DSet { entity: child });
        }
        Ok(child)
    }

    /// Remove a node and its whole subtree
    pub fn despawn(&mut self, entity: Entity) -> Result<(), SceneError> {
        if entity == self.root {
            return Err(SceneError::CannotRemoveRoot);
        }
        let parent = self.node(entity)?.parent.ok_or(SceneError::CannotRemoveRoot)?;

        for descendant in self.descendants(entity)? {
            self.nodes.remove(descendant);
        }
        self.nodes.remove(entity);
        self.node_mut(parent)?.children.retain(|&c| c != entity);

        self.bus.publish(&SceneMutation::ChildRemoved { parent, child: entity });
        Ok(())
    }

    fn attribute_changed(&self, entity: Entity, attribute: &str) {
        self.bus.publish(&SceneMutation::AttributeChanged {
            entity,
            attribute: attribute.to_string(),
        });
    }

    /// Replace the local transform
    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> Result<(), SceneError> {
        self.node_mut(entity)?.transform = transform;
        self.attribute_changed(entity, "transform");
        Ok(())
    }

    /// Replace the local position
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), SceneError> {
        self.node_mut(entity)?.transform.position = position;
        self.attribute_changed(entity, "position");
        Ok(())
    }

    /// Replace the local rotation, given as Euler angles in degrees
    pub fn set_rotation_degrees(&mut self, entity: Entity, degrees: Vec3) -> Result<(), SceneError> {
        let node = self.node_mut(entity)?;
        node.transform = node.transform.clone().with_rotation_degrees(degrees);
        self.attribute_changed(entity, "rotation");
        Ok(())
    }

    /// Set or clear the geometry
    pub fn set_geometry(&mut self, entity: Entity, geometry: Option<Geometry>) -> Result<(), SceneError> {
        let node = self.node_mut(entity)?;
        let had_geometry = node.geometry.is_some();
        node.geometry = geometry;

        self.attribute_changed(entity, "geometry");
        match (had_geometry, geometry.is_some()) {
            (false, true) => self.bus.publish(&SceneMutation::Object3DSet { entity }),
            (true, false) => self.bus.publish(&SceneMutation::Object3DRemoved { entity }),
            _ => {}
        }
        Ok(())
    }

    /// Set or clear the material
    pub fn set_material(&mut self, entity: Entity, material: Option<Material>) -> Result<(), SceneError> {
        self.node_mut(entity)?.material = material;
        self.attribute_changed(entity, "material");
        Ok(())
    }

    /// Add a class if not already present
    pub fn add_class(&mut self, entity: Entity, class: &str) -> Result<(), SceneError> {
        let node = self.node_mut(entity)?;
        if !node.has_class(class) {
            node.classes.push(class.to_string());
            self.attribute_changed(entity, "class");
        }
        Ok(())
    }

    /// Record that a component is attached to a node
    pub fn add_component_name(&mut self, entity: Entity, name: &str) -> Result<(), SceneError> {
        let node = self.node_mut(entity)?;
        if !node.has_component(name) {
            node.components.push(name.to_string());
            self.attribute_changed(entity, name);
        }
        Ok(())
    }

    /// Record that a component was detached from a node
    pub fn remove_component_name(&mut self, entity: Entity, name: &str) -> Result<(), SceneError> {
        let node = self.node_mut(entity)?;
        let before = node.components.len();
        node.components.retain(|c| c != name);
        if node.components.len() != before {
            self.attribute_changed(entity, name);
        }
        Ok(())
    }

    /// Parent of a node
    pub fn parent(&self, entity: Entity) -> Result<Option<Entity>, SceneError> {
        Ok(self.node(entity)?.parent)
    }

    /// Children of a node in insertion order
    pub fn children(&self, entity: Entity) -> Result<&[Entity], SceneError> {
        Ok(self.node(entity)?.children())
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, entity: Entity) -> Result<Vec<Entity>, SceneError> {
        let mut ancestors = Vec::new();
        let mut current = self.node(entity)?.parent;
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.node(parent)?.parent;
        }
        Ok(ancestors)
    }

    /// All descendants in document (pre-)order, `entity` excluded
    pub fn descendants(&self, entity: Entity) -> Result<Vec<Entity>, SceneError> {
        let mut out = Vec::new();
        let mut stack: Vec<Entity> = self.node(entity)?.children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current)?.children.iter().rev().copied());
        }
        Ok(out)
    }

    /// Descendants of `scope` matching `selector`, in document order
    pub fn query_all_in(&self, scope: Entity, selector: &Selector) -> Result<Vec<Entity>, SceneError> {
        Ok(self
            .descendants(scope)?
            .into_iter()
            .filter(|&e| self.matches(e, selector))
            .collect())
    }

    /// Check a node against a selector, ancestors included
    pub fn matches(&self, entity: Entity, selector: &Selector) -> bool {
        let mut path = Vec::new();
        let mut current = Some(entity);
        while let Some(e) = current {
            let Some(node) = self.nodes.get(e) else {
                return false;
            };
            path.push(node);
            current = node.parent;
        }
        selector.matches_path(&path)
    }

    /// Nodes in the whole scene matching `selector`, in document order
    pub fn query_all(&self, selector: &Selector) -> Vec<Entity> {
        self.query_all_in(self.root, selector).unwrap_or_default()
    }

    /// First node in the scene matching `selector`
    pub fn query_first(&self, selector: &Selector) -> Option<Entity> {
        self.query_all(selector).into_iter().next()
    }

    /// Node with the given element id
    pub fn find_by_id(&self, id: &str) -> Option<Entity> {
        self.query_first(&Selector::id(id))
    }

    /// Nearest ancestor (not `entity` itself) carrying `component`
    pub fn closest_ancestor_with_component(&self, entity: Entity, component: &str) -> Result<Option<Entity>, SceneError> {
        Ok(self
            .ancestors(entity)?
            .into_iter()
            .find(|&a| self.nodes.get(a).is_some_and(|node| node.has_component(component))))
    }

    /// Local-to-world matrix of a node
    pub fn world_matrix(&self, entity: Entity) -> Result<Mat4, SceneError> {
        let mut matrix = self.node(entity)?.transform.to_matrix();
        for ancestor in self.ancestors(entity)? {
            matrix = self.node(ancestor)?.transform.to_matrix() * matrix;
        }
        Ok(matrix)
    }

    /// World position of a node's origin
    pub fn world_position(&self, entity: Entity) -> Result<Vec3, SceneError> {
        self.local_to_world(entity, Vec3::zeros())
    }

    /// Convert a point in the node's local space to world space
    pub fn local_to_world(&self, entity: Entity, point: Vec3) -> Result<Vec3, SceneError> {
        let matrix = self.world_matrix(entity)?;
        Ok(matrix.transform_point(&Point3::from(point)).coords)
    }

    /// Convert a world point into the node's local space
    pub fn world_to_local(&self, entity: Entity, point: Vec3) -> Result<Vec3, SceneError> {
        let inverse = self
            .world_matrix(entity)?
            .try_inverse()
            .ok_or(SceneError::SingularTransform(entity))?;
        Ok(inverse.transform_point(&Point3::from(point)).coords)
    }

    /// Convert a world point into the space the node's position is expressed in
    pub fn world_to_parent_local(&self, entity: Entity, point: Vec3) -> Result<Vec3, SceneError> {
        match self.node(entity)?.parent {
            Some(parent) => self.world_to_local(parent, point),
            None => Ok(point),
        }
    }

    /// World-space bounds of a node and its subtree.
    ///
    /// `None` when nothing in the subtree has geometry.
    pub fn compute_world_aabb(&self, entity: Entity) -> Result<Option<AABB>, SceneError> {
        let mut bounds: Option<AABB> = None;
        let mut stack = vec![(entity, self.world_matrix(entity)?)];

        while let Some((current, matrix)) = stack.pop() {
            let node = self.node(current)?;
            if let Some(geometry) = &node.geometry {
                let world = geometry.local_bounds().transformed(&matrix);
                bounds = Some(bounds.map_or(world, |b| b.union(&world)));
            }
            for &child in &node.children {
                let child_matrix = matrix * self.node(child)?.transform.to_matrix();
                stack.push((child, child_matrix));
            }
        }
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mutation::MutationKinds;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn unit_box() -> Geometry {
        Geometry::Box { width: 2.0, height: 2.0, depth: 2.0 }
    }

    #[test]
    fn test_spawn_and_despawn_subtree() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let parent = tree.spawn(root, SceneNode::entity()).unwrap();
        let child = tree.spawn(parent, SceneNode::entity()).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.children(root).unwrap(), &[parent]);

        tree.despawn(parent).unwrap();
        assert!(!tree.contains(child));
        assert!(tree.is_empty());
        assert!(matches!(tree.despawn(root), Err(SceneError::CannotRemoveRoot)));
        assert!(matches!(tree.despawn(parent), Err(SceneError::UnknownEntity(_))));
    }

    #[test]
    fn test_mutations_are_published() {
        let mut tree = SceneTree::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _subscription = tree
            .bus()
            .subscribe(MutationKinds::all(), Box::new(move |m| sink.borrow_mut().push(m.kind())));

        let root = tree.root();
        let node = tree.spawn(root, SceneNode::entity().with_geometry(unit_box())).unwrap();
        tree.set_position(node, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        tree.despawn(node).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                MutationKinds::CHILD_LIST,
                MutationKinds::OBJECT3D,
                MutationKinds::ATTRIBUTES,
                MutationKinds::CHILD_LIST,
            ]
        );
    }

    #[test]
    fn test_world_matrix_composes_ancestors() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let parent = tree
            .spawn(
                root,
                SceneNode::entity().with_transform(
                    Transform::from_position(Vec3::new(0.0, 1.0, 0.0))
                        .with_rotation_degrees(Vec3::new(0.0, 90.0, 0.0)),
                ),
            )
            .unwrap();
        let child = tree
            .spawn(parent, SceneNode::entity().with_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        let world = tree.world_position(child).unwrap();
        assert_relative_eq!(world, Vec3::new(0.0, 1.0, -1.0), epsilon = 1e-5);

        let back = tree.world_to_parent_local(child, world).unwrap();
        assert_relative_eq!(back, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_world_aabb_includes_descendants() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let group = tree.spawn(root, SceneNode::entity().with_position(Vec3::new(10.0, 0.0, 0.0))).unwrap();
        assert_eq!(tree.compute_world_aabb(group).unwrap(), None);

        tree.spawn(group, SceneNode::new(BOX_TAG).with_geometry(unit_box())).unwrap();
        tree.spawn(
            group,
            SceneNode::new(BOX_TAG)
                .with_geometry(unit_box())
                .with_position(Vec3::new(0.0, 5.0, 0.0)),
        )
        .unwrap();

        let bounds = tree.compute_world_aabb(group).unwrap().unwrap();
        assert_relative_eq!(bounds.min, Vec3::new(9.0, -1.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(bounds.max, Vec3::new(11.0, 6.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_query_in_document_order() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let a = tree.spawn(root, SceneNode::entity().with_class("prop")).unwrap();
        let a_child = tree.spawn(a, SceneNode::new(BOX_TAG).with_class("prop")).unwrap();
        let b = tree.spawn(root, SceneNode::entity().with_id("b").with_class("prop")).unwrap();

        let selector: Selector = ".prop".parse().unwrap();
        assert_eq!(tree.query_all(&selector), vec![a, a_child, b]);
        assert_eq!(tree.find_by_id("b"), Some(b));
        assert_eq!(tree.find_by_id("missing"), None);
    }

    #[test]
    fn test_query_with_combinators() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let room = tree.spawn(root, SceneNode::entity().with_class("room")).unwrap();
        let shelf = tree.spawn(room, SceneNode::entity()).unwrap();
        let nested = tree.spawn(shelf, SceneNode::new(BOX_TAG).with_class("prop")).unwrap();
        let direct = tree.spawn(room, SceneNode::new(BOX_TAG).with_class("prop")).unwrap();
        tree.spawn(root, SceneNode::new(BOX_TAG).with_class("prop")).unwrap();

        let descendant: Selector = ".room .prop".parse().unwrap();
        assert_eq!(tree.query_all(&descendant), vec![nested, direct]);

        let child: Selector = ".room > .prop".parse().unwrap();
        assert_eq!(tree.query_all(&child), vec![direct]);

        let from_scene: Selector = "a-scene > a-entity a-box".parse().unwrap();
        assert_eq!(tree.query_all(&from_scene), vec![nested, direct]);
    }

    #[test]
    fn test_declared_component_name_is_visible_before_attach() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let lounge = tree
            .spawn(root, SceneNode::entity().with_component_name("lounge").with_component_name("lounge"))
            .unwrap();
        let prop = tree.spawn(lounge, SceneNode::entity()).unwrap();

        assert_eq!(tree.node(lounge).unwrap().components(), &["lounge".to_string()]);
        assert_eq!(tree.closest_ancestor_with_component(prop, "lounge").unwrap(), Some(lounge));
        assert_eq!(tree.query_first(&Selector::component("lounge")), Some(lounge));
    }

    #[test]
    fn test_closest_ancestor_with_component() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let outer = tree.spawn(root, SceneNode::entity()).unwrap();
        tree.add_component_name(outer, "lounge").unwrap();
        let inner = tree.spawn(outer, SceneNode::entity()).unwrap();
        let leaf = tree.spawn(inner, SceneNode::entity()).unwrap();

        assert_eq!(tree.closest_ancestor_with_component(leaf, "lounge").unwrap(), Some(outer));
        assert_eq!(tree.closest_ancestor_with_component(outer, "lounge").unwrap(), None);
    }
}
