//! Cypher statements issued by the Neo4j backend.
//!
//! Labels, property keys and relationship types cannot be parameters, so
//! statements that need them are built by the functions below from names
//! already checked by `validate_identifier`.

/// Distinct project names, sorted.
pub const PROJECT_NAMES: &str = r#"
MATCH (p:Project)
WHERE p.name IS NOT NULL
RETURN DISTINCT toString(p.name) AS name
ORDER BY name
"#;

/// Total relationship count.
pub const RELATIONSHIP_COUNT: &str = r#"
MATCH ()-[r]->()
RETURN count(r) AS count
"#;

pub const NODE_COUNT: &str = r#"
MATCH (n)
RETURN count(n) AS count
"#;

pub const LABEL_COUNTS: &str = r#"
MATCH (n)
UNWIND labels(n) AS label
RETURN label, count(*) AS count
"#;

pub const RELATIONSHIP_TYPE_COUNTS: &str = r#"
MATCH ()-[r]->()
RETURN type(r) AS rel_type, count(*) AS count
"#;

/// `MERGE (n:Label {key: $value}) SET n += $props`, reporting whether the
/// node was new.
pub fn merge_node(label: &str, key: &str) -> String {
    format!(
        "OPTIONAL MATCH (existing:`{label}` {{`{key}`: $value}})
         WITH count(existing) = 0 AS created
         MERGE (n:`{label}` {{`{key}`: $value}})
         SET n += $props
         RETURN created"
    )
}

/// `MERGE (a)-[:TYPE]->(b) SET r += $props` between two nodes found by key.
pub fn merge_relationship(
    from_label: &str,
    from_key: &str,
    to_label: &str,
    to_key: &str,
    rel_type: &str,
) -> String {
    format!(
        "MATCH (a:`{from_label}` {{`{from_key}`: $from}}), (b:`{to_label}` {{`{to_key}`: $to}})
         OPTIONAL MATCH (a)-[existing:`{rel_type}`]->(b)
         WITH a, b, count(existing) = 0 AS created
         MERGE (a)-[r:`{rel_type}`]->(b)
         SET r += $props
         RETURN created"
    )
}

/// The named project (smallest `id` when names collide) and every path of
/// 1..=`hops` relationships leaving it, in either direction. A project with
/// no relationships yields one row with a null neighbour.
pub fn neighborhood(hops: u8) -> String {
    format!(
        "MATCH (p:Project {{name: $name}})
         WITH p ORDER BY p.id LIMIT 1
         OPTIONAL MATCH path = (p)-[*1..{hops}]-(n)
         RETURN elementId(p) AS center_id,
                labels(p) AS center_labels,
                properties(p) AS center_props,
                elementId(n) AS node_id,
                labels(n) AS node_labels,
                properties(n) AS node_props,
                [r IN relationships(path) | {{
                    id: elementId(r),
                    start: elementId(startNode(r)),
                    end: elementId(endNode(r)),
                    rel_type: type(r),
                    properties: properties(r)
                }}] AS path"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_node_statement() {
        let q = merge_node("Project", "id");
        assert!(q.contains("MERGE (n:`Project` {`id`: $value})"));
        assert!(q.contains("SET n += $props"));
    }

    #[test]
    fn test_merge_relationship_statement() {
        let q = merge_relationship("Project", "demo_id", "Organization", "demo_id", "EXECUTED_BY");
        assert!(q.contains("(a:`Project` {`demo_id`: $from})"));
        assert!(q.contains("(b:`Organization` {`demo_id`: $to})"));
        assert!(q.contains("MERGE (a)-[r:`EXECUTED_BY`]->(b)"));
    }

    #[test]
    fn test_neighborhood_hop_bound() {
        assert!(neighborhood(1).contains("[*1..1]"));
        assert!(neighborhood(2).contains("[*1..2]"));
    }
}
