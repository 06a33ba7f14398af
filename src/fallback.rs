//! Placeholder datasets shown when a stage fails.
//!
//! Built from constant tables, so they cannot fail to load.

use crate::models::{
    feature_id, Deliverable, Feature, Level, PocFocus, PocVersion, Priority, Risk, RiskCategory,
};

const FEATURES: [(&str, &str, Level); 5] = [
    (
        "User Authentication",
        "Login, registration, and user management system",
        Level::Medium,
    ),
    (
        "Dashboard Analytics",
        "Real-time analytics dashboard with charts and metrics",
        Level::High,
    ),
    (
        "Payment Processing",
        "Stripe integration for handling payments and subscriptions",
        Level::Medium,
    ),
    (
        "Mobile App",
        "Native iOS and Android mobile applications",
        Level::High,
    ),
    (
        "API Integration",
        "Third-party API integrations for data synchronization",
        Level::Medium,
    ),
];

const PRIORITIES: [(&str, Level, &str); 5] = [
    (
        "User Authentication",
        Level::High,
        "Foundation for all user-related features and security",
    ),
    (
        "Payment Processing",
        Level::High,
        "Critical for revenue generation and business model",
    ),
    (
        "Dashboard Analytics",
        Level::Medium,
        "Important for user engagement but not MVP critical",
    ),
    (
        "API Integration",
        Level::Medium,
        "Enhances functionality but can be phased in later",
    ),
    (
        "Mobile App",
        Level::Low,
        "Nice to have but web app covers core functionality",
    ),
];

struct RiskRow {
    title: &'static str,
    description: &'static str,
    severity: Level,
    category: RiskCategory,
    impact: &'static str,
    mitigation: &'static str,
}

const RISKS: [RiskRow; 4] = [
    RiskRow {
        title: "Third-party API Dependencies",
        description: "Reliance on external APIs could cause delays if APIs change or have downtime",
        severity: Level::High,
        category: RiskCategory::Technical,
        impact: "Could cause significant delays and require architecture changes if APIs become unavailable or incompatible",
        mitigation: "Implement fallback mechanisms, API versioning strategy, and comprehensive error handling. Consider backup API providers.",
    },
    RiskRow {
        title: "Mobile Development Complexity",
        description: "Native mobile apps require specialized expertise and longer development cycles",
        severity: Level::Medium,
        category: RiskCategory::Timeline,
        impact: "May extend project timeline by 4-6 weeks and require additional specialized developers",
        mitigation: "Consider cross-platform frameworks like React Native, hire experienced mobile developers early, or phase mobile development separately.",
    },
    RiskRow {
        title: "Analytics Performance",
        description: "Real-time analytics may require complex database optimization and caching",
        severity: Level::Medium,
        category: RiskCategory::Technical,
        impact: "Could lead to slow dashboard performance and poor user experience as data volume grows",
        mitigation: "Implement database indexing, caching layers, and consider using specialized analytics databases like ClickHouse or BigQuery.",
    },
    RiskRow {
        title: "Payment Compliance",
        description: "PCI compliance and payment security requirements may add complexity",
        severity: Level::High,
        category: RiskCategory::Technical,
        impact: "Non-compliance could prevent launch and require significant rework of payment systems",
        mitigation: "Use PCI-compliant payment processors like Stripe, implement proper security audits, and follow PCI DSS guidelines from the start.",
    },
];

const POCS: [(&str, PocFocus, [&str; 3], &str, f64); 3] = [
    (
        "Revenue-Focused MVP",
        PocFocus::Revenue,
        ["User Authentication", "Payment Processing", "Basic Dashboard"],
        "8-10 weeks",
        48000.0,
    ),
    (
        "Fundraising Demo",
        PocFocus::Fundraising,
        ["User Authentication", "Dashboard Analytics", "API Integration Demo"],
        "6-8 weeks",
        36000.0,
    ),
    (
        "Risk Mitigation POC",
        PocFocus::RiskMitigation,
        ["User Authentication", "API Integration Testing", "Payment Processing"],
        "10-12 weeks",
        54000.0,
    ),
];

const DELIVERABLES: [(&str, &str, &str, f64); 4] = [
    (
        "User Authentication System",
        "Complete login, registration, password reset, and user management",
        "2 weeks",
        12000.0,
    ),
    (
        "Payment Integration",
        "Stripe integration with subscription management and billing",
        "3 weeks",
        18000.0,
    ),
    (
        "Core Dashboard",
        "Basic analytics dashboard with key metrics and charts",
        "3 weeks",
        18000.0,
    ),
    (
        "API Foundation",
        "RESTful API with authentication and core endpoints",
        "2 weeks",
        12000.0,
    ),
];

pub fn features() -> Vec<Feature> {
    FEATURES
        .iter()
        .enumerate()
        .map(|(i, (title, description, complexity))| Feature {
            id: feature_id(i),
            title: title.to_string(),
            description: description.to_string(),
            complexity: Some(*complexity),
            source: None,
        })
        .collect()
}

pub fn priorities() -> Vec<Priority> {
    PRIORITIES
        .iter()
        .enumerate()
        .map(|(i, (feature, priority, reasoning))| Priority {
            id: (i + 1).to_string(),
            feature: feature.to_string(),
            priority: *priority,
            reasoning: reasoning.to_string(),
        })
        .collect()
}

pub fn risks() -> Vec<Risk> {
    RISKS
        .iter()
        .enumerate()
        .map(|(i, row)| Risk {
            id: (i + 1).to_string(),
            title: row.title.to_string(),
            description: row.description.to_string(),
            severity: row.severity,
            category: row.category,
            impact: row.impact.to_string(),
            mitigation: row.mitigation.to_string(),
        })
        .collect()
}

pub fn poc_versions() -> Vec<PocVersion> {
    POCS.iter()
        .enumerate()
        .map(|(i, (title, focus, features, time_estimate, cost))| PocVersion {
            id: (i + 1).to_string(),
            title: title.to_string(),
            focus: *focus,
            features: features.iter().map(|f| f.to_string()).collect(),
            time_estimate: time_estimate.to_string(),
            cost: *cost,
        })
        .collect()
}

pub fn mvp_deliverables() -> Vec<Deliverable> {
    DELIVERABLES
        .iter()
        .enumerate()
        .map(|(i, (title, description, time_estimate, cost))| Deliverable {
            id: (i + 1).to_string(),
            title: title.to_string(),
            description: description.to_string(),
            time_estimate: time_estimate.to_string(),
            cost: *cost,
        })
        .collect()
}
