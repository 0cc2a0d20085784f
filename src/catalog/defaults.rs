//! Built-in skill catalog

use super::CatalogSpec;
use std::collections::BTreeMap;

fn weights(entries: &[(&str, u8)]) -> BTreeMap<String, u8> {
    entries.iter().map(|(skill, w)| (skill.to_string(), *w)).collect()
}

fn names(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

pub(super) fn builtin_spec() -> CatalogSpec {
    let mut roles = BTreeMap::new();
    roles.insert(
        "Frontend Engineer".to_string(),
        weights(&[
            ("React", 5),
            ("TypeScript", 4),
            ("JavaScript", 4),
            ("CSS", 3),
            ("HTML", 2),
            ("Next.js", 3),
            ("Redux", 2),
            ("Jest", 2),
        ]),
    );
    roles.insert(
        "Backend Engineer".to_string(),
        weights(&[
            ("Node.js", 5),
            ("Python", 4),
            ("PostgreSQL", 4),
            ("MongoDB", 3),
            ("Redis", 3),
            ("Docker", 3),
            ("REST", 2),
            ("GraphQL", 2),
        ]),
    );
    roles.insert(
        "Full Stack Engineer".to_string(),
        weights(&[
            ("React", 4),
            ("Node.js", 4),
            ("TypeScript", 4),
            ("PostgreSQL", 3),
            ("Docker", 2),
            ("AWS", 3),
            ("GraphQL", 2),
        ]),
    );
    roles.insert(
        "Data Scientist".to_string(),
        weights(&[
            ("Python", 5),
            ("Machine Learning", 5),
            ("SQL", 4),
            ("Pandas", 3),
            ("TensorFlow", 3),
            ("PyTorch", 3),
            ("Statistics", 3),
        ]),
    );
    roles.insert(
        "DevOps Engineer".to_string(),
        weights(&[
            ("Kubernetes", 5),
            ("Docker", 4),
            ("Terraform", 4),
            ("AWS", 4),
            ("CI/CD", 3),
            ("Linux", 3),
            ("Prometheus", 2),
        ]),
    );

    let mut aliases = BTreeMap::new();
    aliases.insert("Node.js".to_string(), names(&["node", "nodejs", "node js"]));
    aliases.insert("React".to_string(), names(&["reactjs", "react.js"]));
    aliases.insert("TypeScript".to_string(), names(&["ts-node", "tsx"]));
    aliases.insert("JavaScript".to_string(), names(&["ecmascript", "es6"]));
    aliases.insert("Next.js".to_string(), names(&["nextjs"]));
    aliases.insert("PostgreSQL".to_string(), names(&["postgres", "psql"]));
    aliases.insert("MongoDB".to_string(), names(&["mongo"]));
    aliases.insert("Kubernetes".to_string(), names(&["k8s"]));
    aliases.insert("Machine Learning".to_string(), names(&["ml model", "deep learning"]));
    aliases.insert("CI/CD".to_string(), names(&["continuous integration", "github actions", "jenkins"]));
    aliases.insert("AWS".to_string(), names(&["amazon web services", "ec2", "lambda"]));
    aliases.insert("Statistics".to_string(), names(&["statistical", "a/b test"]));

    let mut clusters = BTreeMap::new();
    clusters.insert(
        "Frontend".to_string(),
        names(&["React", "TypeScript", "JavaScript", "CSS", "HTML", "Next.js", "Redux"]),
    );
    clusters.insert(
        "Backend".to_string(),
        names(&["Node.js", "Python", "PostgreSQL", "MongoDB", "Redis", "REST", "GraphQL", "SQL"]),
    );
    clusters.insert(
        "Infrastructure".to_string(),
        names(&["Docker", "Kubernetes", "Terraform", "AWS", "CI/CD", "Linux", "Prometheus"]),
    );
    clusters.insert(
        "Data".to_string(),
        names(&["Machine Learning", "Pandas", "TensorFlow", "PyTorch", "Statistics", "SQL"]),
    );
    clusters.insert("Testing".to_string(), names(&["Jest"]));

    CatalogSpec {
        action_verbs: names(&[
            "developed",
            "led",
            "built",
            "managed",
            "engineered",
            "designed",
            "implemented",
            "architected",
            "launched",
            "optimized",
        ]),
        roles,
        aliases,
        clusters,
    }
}
