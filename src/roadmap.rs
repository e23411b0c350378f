// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Private learning roadmap shown behind the admin gate.
//!
//! Categories hold skills, skills hold concepts, and each concept can be
//! checked off, renamed, linked to a resource, deleted, or added. The
//! outline, the checked state and the links are kept in the local
//! settings file under separate keys.

use crate::io::settings::{SettingsStore, ROADMAP_DATA, ROADMAP_LINKS, ROADMAP_STATUS};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub concepts: Vec<Concept>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub skills: Vec<Skill>,
}

/// The editable outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub categories: Vec<Category>,
}

/// Checked concepts out of all concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    pub percent: u32,
}

/// Outline plus per-concept checked state and resource links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roadmap {
    pub data: RoadmapData,
    status: BTreeMap<String, bool>,
    links: BTreeMap<String, String>,
}

impl Default for Roadmap {
    fn default() -> Self {
        Self {
            data: seed_data(),
            status: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }
}

impl Roadmap {
    /// Read the roadmap from settings, falling back to the built-in outline.
    pub fn load(settings: &SettingsStore) -> Self {
        Self {
            data: settings.get_json(ROADMAP_DATA).unwrap_or_else(seed_data),
            status: settings.get_json(ROADMAP_STATUS).unwrap_or_default(),
            links: settings.get_json(ROADMAP_LINKS).unwrap_or_default(),
        }
    }

    pub fn save(&self, settings: &mut SettingsStore) -> Result<()> {
        settings.set_json(ROADMAP_DATA, &self.data)?;
        settings.set_json(ROADMAP_STATUS, &self.status)?;
        settings.set_json(ROADMAP_LINKS, &self.links)?;
        Ok(())
    }

    fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.data
            .categories
            .iter()
            .flat_map(|c| c.skills.iter())
            .flat_map(|s| s.concepts.iter())
    }

    fn concept_mut(&mut self, id: &str) -> Option<&mut Concept> {
        self.data
            .categories
            .iter_mut()
            .flat_map(|c| c.skills.iter_mut())
            .flat_map(|s| s.concepts.iter_mut())
            .find(|k| k.id == id)
    }

    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts().find(|k| k.id == id)
    }

    pub fn progress(&self) -> Progress {
        let total = self.concepts().count();
        let done = self.concepts().filter(|k| self.is_done(&k.id)).count();
        let percent = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u32
        };
        Progress { done, total, percent }
    }

    pub fn is_done(&self, id: &str) -> bool {
        self.status.get(id).copied().unwrap_or(false)
    }

    pub fn set_done(&mut self, id: &str, done: bool) {
        if self.concept(id).is_some() {
            self.status.insert(id.to_string(), done);
        }
    }

    /// Saved link for a concept, else the one it was seeded with.
    pub fn link<'a>(&'a self, concept: &'a Concept) -> Option<&'a str> {
        self.links
            .get(&concept.id)
            .map(String::as_str)
            .or(concept.url.as_deref())
    }

    /// Rename a concept and set or clear its link. A blank title is refused.
    pub fn save_concept(&mut self, id: &str, title: &str, url: &str) -> bool {
        let (title, url) = (title.trim(), url.trim());
        if title.is_empty() {
            return false;
        }
        let Some(concept) = self.concept_mut(id) else {
            return false;
        };
        concept.title = title.to_string();
        if url.is_empty() {
            self.links.remove(id);
        } else {
            self.links.insert(id.to_string(), url.to_string());
        }
        true
    }

    /// Remove a concept together with its checked state and link.
    pub fn delete_concept(&mut self, id: &str) -> bool {
        let mut removed = false;
        for skill in self.data.categories.iter_mut().flat_map(|c| c.skills.iter_mut()) {
            let before = skill.concepts.len();
            skill.concepts.retain(|k| k.id != id);
            removed |= skill.concepts.len() != before;
        }
        self.status.remove(id);
        self.links.remove(id);
        removed
    }

    /// Append a concept to a skill. Returns the new concept's id.
    pub fn add_concept(&mut self, skill_id: &str, title: &str, url: &str) -> Option<String> {
        let (title, url) = (title.trim(), url.trim());
        if title.is_empty() {
            return None;
        }
        let taken: HashSet<&str> = self.concepts().map(|k| k.id.as_str()).collect();
        let id = unique_id(&taken, title);

        let skill = self
            .data
            .categories
            .iter_mut()
            .flat_map(|c| c.skills.iter_mut())
            .find(|s| s.id == skill_id)?;
        skill.concepts.push(Concept {
            id: id.clone(),
            title: title.to_string(),
            url: None,
        });
        if !url.is_empty() {
            self.links.insert(id.clone(), url.to_string());
        }
        Some(id)
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn unique_id(taken: &HashSet<&str>, title: &str) -> String {
    let slug = slugify(title);
    let base = if slug.is_empty() {
        "k".to_string()
    } else {
        format!("k-{}", slug)
    };
    if !taken.contains(base.as_str()) {
        return base;
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or(base)
}

fn skill(id: &str, title: &str, concepts: &[(&str, &str)]) -> Skill {
    Skill {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        concepts: concepts
            .iter()
            .map(|(id, title)| Concept {
                id: id.to_string(),
                title: title.to_string(),
                url: None,
            })
            .collect(),
    }
}

fn category(id: &str, title: &str, skills: Vec<Skill>) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
        summary: None,
        skills,
    }
}

/// Built-in Data & AI outline.
pub fn seed_data() -> RoadmapData {
    RoadmapData {
        title: "Data & AI Roadmap".to_string(),
        subtitle: None,
        categories: vec![
            category(
                "core-data",
                "Core Data & Analytics",
                vec![
                    skill(
                        "data-eng",
                        "Data Architecture & Engineering",
                        &[
                            ("k-de-arch", "Lakehouse vs Warehouse vs Data Lake"),
                            ("k-de-sql", "SQL & Query Optimization"),
                            ("k-de-modeling", "Data Modeling (Dimensional, Data Vault)"),
                            ("k-de-files", "File Formats & Partitioning (Parquet, ORC, Iceberg/Delta)"),
                            ("k-de-elt", "ELT/ETL Patterns & Orchestration (Airflow/Prefect)"),
                            ("k-de-dbt", "dbt & Analytics Engineering"),
                            ("k-de-stream", "Streaming & CDC (Kafka, Debezium)"),
                            ("k-de-spark", "Spark & Distributed Compute Basics"),
                            ("k-de-quality", "Data Quality, Testing, Contracts, Lineage"),
                            ("k-de-catalog", "Catalog & Discovery (Data Catalog/Glossary)"),
                            ("k-de-security", "Security & Access (RBAC/ABAC, Tokenization)"),
                            ("k-de-cost", "Cost & Performance Tuning (Compute/Storage)"),
                            ("k-de-ci", "CI/CD for Data (Git, CI, Environments)"),
                            ("k-de-iac", "Infra as Code, Containers & K8s (basics)"),
                            ("k-de-medallion", "Medallion Architecture & DQ SLAs"),
                        ],
                    ),
                    skill(
                        "governance",
                        "Data Management & Governance",
                        &[
                            ("k-gov-mdm", "Domains, MDM, Golden Records"),
                            ("k-gov-privacy", "Privacy & Compliance (GDPR/CCPA/HIPAA/PCI)"),
                            ("k-gov-pii", "PII Handling, De-identification, Consent"),
                            ("k-gov-policy", "Policies, Stewardship & Governance Operating Model"),
                            ("k-gov-quality", "Data Quality Policies, SLAs, Lineage"),
                            ("k-gov-access", "Access Controls, Audit Logging"),
                            ("k-gov-sharing", "Data Sharing Agreements & Contracts"),
                            ("k-gov-retention", "Retention & Data Lifecycle Management"),
                        ],
                    ),
                    skill(
                        "bi",
                        "Analytics & BI",
                        &[
                            ("k-bi-kpi", "KPI Trees & Metric Definitions"),
                            ("k-bi-sem", "Semantic/Metric Layer (dbt/LookML/Power BI)"),
                            ("k-bi-viz", "Data Visualization & Dashboard Design Principles"),
                            ("k-bi-sql", "Analytical SQL (Windows, Time Series)"),
                            ("k-bi-forecast", "Forecasting Basics & Accuracy"),
                            ("k-bi-exp", "Experimentation (A/B), Causal Thinking"),
                            ("k-bi-perf", "BI Performance Tuning & Governance"),
                            ("k-bi-story", "Executive Storytelling & Insight Framing"),
                        ],
                    ),
                ],
            ),
            category(
                "ai",
                "AI & Advanced Analytics",
                vec![
                    skill(
                        "ml",
                        "ML & AI Fundamentals",
                        &[
                            ("k-ml-task", "Supervised vs Unsupervised; Bias/Variance"),
                            ("k-ml-fe", "Feature Engineering & Regularization"),
                            ("k-ml-val", "Train/Val/Test; Leakage & Robust Evaluation"),
                            ("k-ml-metrics", "Metrics (ROC/AUC, F1, MAE/MAPE)"),
                            ("k-ml-int", "Model Interpretability (SHAP/LIME)"),
                            ("k-ml-ts", "Time Series Basics"),
                            ("k-ml-recs", "Recommenders Basics"),
                            ("k-ml-nlp", "Embeddings, Tokenization, Vector Semantics"),
                        ],
                    ),
                    skill(
                        "mlops",
                        "MLOps & Lifecycle",
                        &[
                            ("k-mo-version", "Versioning (Data/Code/Model) & Reproducibility"),
                            ("k-mo-exp", "Experiment Tracking & Model Registry"),
                            ("k-mo-deploy", "Deployment Patterns (Batch/Online/Serverless)"),
                            ("k-mo-monitor", "Monitoring (Data/Concept Drift), Alerting"),
                            ("k-mo-cicd", "CI/CD for ML & Rollbacks"),
                            ("k-mo-feature", "Feature Stores & Real-Time Features"),
                            ("k-mo-eval", "Online Testing (Shadow, A/B, Bandits)"),
                            ("k-mo-gov", "Model Governance/Compliance & Lifecycle Policies"),
                        ],
                    ),
                    skill(
                        "genai",
                        "GenAI & RAG",
                        &[
                            ("k-ga-llm", "LLM Basics (Tokens, Context, Temperature)"),
                            ("k-ga-rag", "RAG: Chunking, Embeddings, Retrieval & Re-ranking"),
                            ("k-ga-eval", "Eval Harnesses (Groundedness, Factuality)"),
                            ("k-ga-safety", "Safety, Guardrails, Red-teaming"),
                            ("k-ga-latency", "Latency/Cost Optimization & Caching"),
                            ("k-ga-privacy", "Privacy, PII Handling, Data Residency"),
                            ("k-ga-agents", "Tools/Agents, Multi-turn State"),
                        ],
                    ),
                ],
            ),
            category(
                "consulting",
                "Consulting & Business",
                vec![
                    skill(
                        "strategy",
                        "Data/AI Strategy & Roadmaps",
                        &[
                            ("k-st-vision", "Value Tree: Vision > Outcomes > KPIs"),
                            ("k-st-operating", "Operating Model & Capability Maturity"),
                            ("k-st-portfolio", "Portfolio & Investment Planning"),
                            ("k-st-roadmap", "Prioritization & 12-18mo Roadmaps"),
                            ("k-st-org", "Org Design, Data Product Thinking"),
                        ],
                    ),
                    skill(
                        "industry",
                        "Industry Depth",
                        &[
                            ("k-in-models", "Domain Data Models & Critical Systems"),
                            ("k-in-reg", "Regulatory Frameworks (sector-specific)"),
                            ("k-in-use", "Canonical Use Cases & ROI Levers"),
                            ("k-in-standards", "Data Exchange Standards & Interop"),
                            ("k-in-vendors", "Vendor Landscape & Partnerships"),
                        ],
                    ),
                    skill(
                        "value",
                        "Value Realization",
                        &[
                            ("k-vr-baseline", "Baseline & Benchmarking"),
                            ("k-vr-okr", "OKRs & Benefits Tracking"),
                            ("k-vr-roi", "ROI/TCO & Financial Modeling"),
                            ("k-vr-adoption", "Adoption Metrics & Change Impact"),
                        ],
                    ),
                ],
            ),
            category(
                "leadership",
                "Leadership & Delivery",
                vec![
                    skill(
                        "advisory",
                        "Client Advisory & Stakeholders",
                        &[
                            ("k-ad-story", "C-suite Storytelling & Structured Recs"),
                            ("k-ad-influence", "Influence, Objection Handling, Negotiation"),
                            ("k-ad-risk", "Risk Framing & Responsible AI Narrative"),
                            ("k-ad-map", "Stakeholder Mapping & Success Criteria"),
                        ],
                    ),
                    skill(
                        "program",
                        "Program & Change Mgmt",
                        &[
                            ("k-pm-methods", "Delivery Methods (Agile/Hybrid)"),
                            ("k-pm-gov", "Program Governance & RACI"),
                            ("k-pm-roadmap", "Roadmap, Risks & Issues Mgmt"),
                            ("k-pm-comms", "Comms, Training & Adoption"),
                            ("k-pm-vendor", "Vendor Mgmt & SOWs"),
                        ],
                    ),
                    skill(
                        "talent",
                        "Team Leadership",
                        &[
                            ("k-tl-hiring", "Hiring Loops, Leveling & Rubrics"),
                            ("k-tl-perf", "Performance & Feedback Cadence"),
                            ("k-tl-mentor", "Mentorship & Growth Plans"),
                            ("k-tl-capacity", "Capacity Planning & Sourcing"),
                            ("k-tl-culture", "Team Culture & Responsible AI"),
                        ],
                    ),
                ],
            ),
            category(
                "trends",
                "Emerging & Strategic",
                vec![
                    skill(
                        "monetization",
                        "Data Monetization",
                        &[
                            ("k-dm-opps", "Opportunity Sizing & Market Fit"),
                            ("k-dm-product", "Data Products, APIs & Platforming"),
                            ("k-dm-pricing", "Pricing, Packaging, Licensing"),
                            ("k-dm-legal", "Legal, IP & Agreements"),
                        ],
                    ),
                    skill(
                        "responsible",
                        "Responsible AI",
                        &[
                            ("k-ra-bias", "Bias/Fairness & Explainability"),
                            ("k-ra-privacy", "Privacy, Security & Red-teaming"),
                            ("k-ra-govern", "AI Governance, Model Cards & Reviews"),
                        ],
                    ),
                    skill(
                        "ecosystem",
                        "Ecosystem & Partnerships",
                        &[
                            ("k-ec-hypers", "Hyperscalers & Co-sell Motions"),
                            ("k-ec-isv", "ISV/Startup Landscape & Alliances"),
                            ("k-ec-gto", "GTM & Partner-led Delivery"),
                        ],
                    ),
                ],
            ),
        ],
    }
}
