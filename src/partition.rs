use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::ir::{ChordData, ChordLink, ChordNode};

/// Keyed view of a chord document: one vertex per distinct `name|group` key,
/// in insertion order, with undirected adjacency between vertices.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex {
    pub keys: Vec<String>,
    pub nodes: Vec<ChordNode>,
    pub adjacency: Vec<BTreeSet<usize>>,
    key_index: HashMap<String, usize>,
    by_name: HashMap<String, Vec<usize>>,
    dangling_links: usize,
}

impl GraphIndex {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }

    /// Every vertex carrying `name`, whatever its group.
    pub fn vertices_named(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[vertex].iter().copied()
    }

    /// Links with at least one endpoint name that matches no node.
    pub fn dangling_links(&self) -> usize {
        self.dangling_links
    }

    fn insert(&mut self, node: &ChordNode) {
        let key = node.key();
        if let Some(&idx) = self.key_index.get(&key) {
            self.nodes[idx] = node.clone();
            return;
        }
        let idx = self.keys.len();
        self.key_index.insert(key.clone(), idx);
        self.keys.push(key);
        self.nodes.push(node.clone());
        self.adjacency.push(BTreeSet::new());
        self.by_name.entry(node.name.clone()).or_default().push(idx);
    }

    fn connect(&mut self, a: usize, b: usize) {
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
    }
}

/// A connected component as ascending vertex indices into a [`GraphIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub members: Vec<usize>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Keys every node and links every source-named vertex to every target-named
/// vertex. A name present in several groups therefore fans out into several
/// edges.
pub fn build_adjacency(data: &ChordData) -> GraphIndex {
    let mut graph = GraphIndex::default();
    for node in &data.nodes {
        graph.insert(node);
    }

    for link in &data.links {
        let sources = graph.vertices_named(&link.source).to_vec();
        let targets = graph.vertices_named(&link.target).to_vec();
        if sources.is_empty() || targets.is_empty() {
            graph.dangling_links += 1;
            continue;
        }
        for &source in &sources {
            for &target in &targets {
                graph.connect(source, target);
            }
        }
    }

    graph
}

/// Breadth-first traversal seeded from each unvisited vertex in insertion
/// order, so component discovery order is stable.
pub fn connected_components(graph: &GraphIndex) -> Vec<Component> {
    let mut visited = vec![false; graph.len()];
    let mut components = Vec::new();

    for start in 0..graph.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            members.push(current);
            for next in graph.neighbors(current) {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        members.sort_unstable();
        components.push(Component { members });
    }

    components
}

/// Links whose source name and target name both resolve to at least one
/// vertex inside `component`, in input order.
pub fn induced_links(graph: &GraphIndex, links: &[ChordLink], component: &Component) -> Vec<ChordLink> {
    let mut inside = vec![false; graph.len()];
    for &member in &component.members {
        inside[member] = true;
    }
    let resolves_inside = |name: &str| graph.vertices_named(name).iter().any(|&v| inside[v]);

    links
        .iter()
        .filter(|link| resolves_inside(&link.source) && resolves_inside(&link.target))
        .cloned()
        .collect()
}

/// Packs whole components into chunks of at most `chunk_size` nodes. A
/// component larger than the budget becomes a chunk of its own; with a budget
/// of zero every component is its own chunk.
pub fn chunk_data(data: &ChordData, chunk_size: usize) -> Vec<ChordData> {
    let graph = build_adjacency(data);
    let components = connected_components(&graph);
    log::debug!(
        "partitioned {} vertices into {} components ({} dangling links)",
        graph.len(),
        components.len(),
        graph.dangling_links()
    );

    let mut chunks = Vec::new();
    let mut current = ChordData::new();

    for component in &components {
        if !current.is_empty() && current.nodes.len() + component.len() > chunk_size {
            chunks.push(std::mem::take(&mut current));
        }
        current
            .nodes
            .extend(component.members.iter().map(|&member| graph.nodes[member].clone()));
        current
            .links
            .extend(induced_links(&graph, &data.links, component));
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    log::debug!("packed components into {} chunks of up to {} nodes", chunks.len(), chunk_size);
    chunks
}
