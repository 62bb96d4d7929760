//! Cross-company relationship graph integration.
//!
//! Each company contributes a small graph of risks, opportunities,
//! strategies, targets and actuals, with every node assigned to a cluster
//! of similar statements. Integration merges nodes sharing a kind and
//! cluster into one cluster node and counts how often each relation links
//! two clusters across companies.
//!
//! Only the merged structure and its statistics are produced here; drawing
//! it is left to the consumer.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of statement a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Risk,
    Opportunity,
    Strategy,
    Target,
    Actual,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Risk => "risk",
            NodeKind::Opportunity => "opportunity",
            NodeKind::Strategy => "strategy",
            NodeKind::Target => "target",
            NodeKind::Actual => "actual",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two statements are linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// A strategy responds to a risk
    AddressesRisk,

    /// A strategy responds to an opportunity
    AddressesOpportunity,

    /// A strategy leads to a target or actual
    LeadsTo,

    /// A target is measured by an actual
    EvaluatedBy,
}

/// A statement extracted from one company's report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub text: String,
    pub cluster: String,
}

/// A directed link between two nodes of the same company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyEdge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

/// One company's relationship graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyGraph {
    /// Company name; `Company_{n}` is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default)]
    pub nodes: Vec<CompanyNode>,

    #[serde(default)]
    pub edges: Vec<CompanyEdge>,
}

/// A statement as recorded inside a cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterText {
    pub company: String,
    pub text: String,
    pub original_id: String,
}

/// Statements of one kind sharing a cluster, across companies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub kind: NodeKind,
    pub texts: Vec<ClusterText>,
    pub companies: BTreeSet<String>,
    pub count: usize,
}

/// Merged link between two clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterEdge {
    pub source: String,
    pub target: String,
    pub relations: BTreeMap<Relation, usize>,
    pub total_weight: usize,
}

/// Aggregate statistics over an integrated graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub total_clusters: usize,

    /// Distinct (source, target, relation) combinations
    pub total_edges: usize,

    pub total_companies: usize,

    /// Statements per node kind
    pub kind_counts: BTreeMap<NodeKind, usize>,

    /// Links per relation, summed over companies
    pub relation_counts: BTreeMap<Relation, usize>,

    pub mean_cluster_size: f64,
    pub max_cluster_size: usize,
}

/// A cluster together with the clusters it links to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterDetails {
    pub cluster_id: String,
    #[serde(flatten)]
    pub cluster: Cluster,
    pub connected_clusters: Vec<String>,
}

/// Clusters and weighted links merged from several company graphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntegratedGraph {
    clusters: BTreeMap<String, Cluster>,
    #[serde(skip)]
    weights: BTreeMap<(String, String, Relation), usize>,
    #[serde(skip)]
    merged: usize,
}

/// Cluster id for a node: `{kind}_{cluster}`.
pub fn cluster_id(kind: NodeKind, cluster: &str) -> String {
    format!("{}_{}", kind, cluster)
}

impl IntegratedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from company graphs in order.
    pub fn from_companies(companies: &[CompanyGraph]) -> Self {
        let mut graph = Self::new();
        for company in companies {
            graph.add_company(company);
        }
        graph
    }

    /// Merge one company graph. Companies without a name are numbered
    /// by arrival order, counting from 1.
    pub fn add_company(&mut self, company: &CompanyGraph) {
        self.merged += 1;
        let name = company
            .company
            .clone()
            .unwrap_or_else(|| format!("Company_{}", self.merged));
        self.merge(&name, company);
    }

    fn company_count(&self) -> usize {
        self.companies().len()
    }

    fn merge(&mut self, name: &str, company: &CompanyGraph) {
        let mut node_clusters: HashMap<&str, String> = HashMap::new();

        for node in &company.nodes {
            let id = cluster_id(node.kind, &node.cluster);
            let cluster = self.clusters.entry(id.clone()).or_insert_with(|| Cluster {
                kind: node.kind,
                texts: Vec::new(),
                companies: BTreeSet::new(),
                count: 0,
            });

            cluster.texts.push(ClusterText {
                company: name.to_string(),
                text: node.text.clone(),
                original_id: node.id.clone(),
            });
            cluster.companies.insert(name.to_string());
            cluster.count += 1;

            node_clusters.insert(node.id.as_str(), id);
        }

        for edge in &company.edges {
            match (
                node_clusters.get(edge.source.as_str()),
                node_clusters.get(edge.target.as_str()),
            ) {
                (Some(source), Some(target)) => {
                    *self
                        .weights
                        .entry((source.clone(), target.clone(), edge.relation))
                        .or_insert(0) += 1;
                }
                _ => {
                    tracing::warn!(
                        company = name,
                        source = %edge.source,
                        target = %edge.target,
                        "Skipping edge with unknown node"
                    );
                }
            }
        }
    }

    pub fn clusters(&self) -> &BTreeMap<String, Cluster> {
        &self.clusters
    }

    pub fn cluster(&self, id: &str) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Every company seen so far.
    pub fn companies(&self) -> BTreeSet<&str> {
        self.clusters
            .values()
            .flat_map(|c| c.companies.iter().map(String::as_str))
            .collect()
    }

    /// Links merged per cluster pair, with per-relation weights.
    pub fn edges(&self) -> Vec<ClusterEdge> {
        let mut merged: BTreeMap<(&str, &str), ClusterEdge> = BTreeMap::new();

        for ((source, target, relation), weight) in &self.weights {
            let edge = merged
                .entry((source.as_str(), target.as_str()))
                .or_insert_with(|| ClusterEdge {
                    source: source.clone(),
                    target: target.clone(),
                    relations: BTreeMap::new(),
                    total_weight: 0,
                });
            *edge.relations.entry(*relation).or_insert(0) += weight;
            edge.total_weight += weight;
        }

        merged.into_values().collect()
    }

    /// Clusters directly reachable from `id`.
    pub fn successors(&self, id: &str) -> Vec<String> {
        let successors: BTreeSet<&str> = self
            .weights
            .keys()
            .filter(|(source, _, _)| source == id)
            .map(|(_, target, _)| target.as_str())
            .collect();
        successors.into_iter().map(str::to_string).collect()
    }

    pub fn summary(&self) -> GraphSummary {
        let mut kind_counts = BTreeMap::new();
        for cluster in self.clusters.values() {
            *kind_counts.entry(cluster.kind).or_insert(0) += cluster.count;
        }

        let mut relation_counts = BTreeMap::new();
        for ((_, _, relation), weight) in &self.weights {
            *relation_counts.entry(*relation).or_insert(0) += weight;
        }

        let sizes: Vec<usize> = self.clusters.values().map(|c| c.count).collect();
        let mean_cluster_size = if sizes.is_empty() {
            0.0
        } else {
            sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
        };

        GraphSummary {
            total_clusters: self.clusters.len(),
            total_edges: self.weights.len(),
            total_companies: self.company_count(),
            kind_counts,
            relation_counts,
            mean_cluster_size,
            max_cluster_size: sizes.into_iter().max().unwrap_or(0),
        }
    }

    pub fn cluster_details(&self, id: &str) -> Option<ClusterDetails> {
        let cluster = self.clusters.get(id)?;
        Some(ClusterDetails {
            cluster_id: id.to_string(),
            cluster: cluster.clone(),
            connected_clusters: self.successors(id),
        })
    }
}
