use slotmap::new_key_type;

new_key_type! {
    /// Identifies a node in the flow graph.
    ///
    /// Generational: a key outlives a wholesale rebuild only as a stale
    /// reference, and stale keys fail registry lookups instead of aliasing
    /// a newer node. Identity comparisons and map keys use this key alone,
    /// never the node's label.
    pub struct NodeId;
}
