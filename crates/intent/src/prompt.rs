use std::fmt::Write as _;

use catalog::{GEO_CLUSTERS, RegionCatalog};

const PREAMBLE: &str = "\
You are a cloud infrastructure architect assistant. Analyze the user's query and respond \
with a single JSON object that controls a 3D globe visualization of cloud regions.";

const ACTIONS: &str = r#"RESPONSE ACTIONS (choose exactly one):

1. highlight_regions
   Use when the user asks about regions by location, geography, latency, availability,
   or single-site deployment ("show me", "options for", "best for", "where to deploy").
   {"action": "highlight_regions", "regions": ["region-code"], "reason": "Brief explanation"}

2. compare_regions
   Use for multi-region, redundancy, failover, DR, replication, or connecting two regions
   ("between X and Y", "failover", "backup", "active-active", "sync", "mirror").
   Modes:
   - "active-active": both regions serve traffic (redundancy, high availability, load balance)
   - "active-passive": primary plus standby failover (failover, DR, standby)
   - "backup": primary plus cold backup (backup, disaster recovery, secondary)
   {"action": "compare_regions", "regions": ["region-code-1", "region-code-2"], "mode": "active-active" | "active-passive" | "backup", "reason": "Brief explanation"}

3. camera_fly
   Use when the user asks to view, zoom, fly to, focus on, or inspect ONE specific region.
   {"action": "camera_fly", "target": "region-code", "reason": "Brief explanation"}

4. provision_architecture
   Use for multi-region architectures with compliance or regulatory requirements
   (GDPR, financial trading, multi-continent applications, global CDN).
   {"action": "provision_architecture", "regions": ["region-code-1", "region-code-2"], "architecture": ["multi-AZ", "active-active", "global-accelerator"], "reason": "Brief explanation"}

5. latency_suggestion
   Use for low-latency questions: gaming, VoIP, streaming, mobile users in a geography.
   Pick the 1-2 closest regions.
   {"action": "latency_suggestion", "regions": ["region-code-1"], "latency_estimate": "10-40ms", "reason": "Closest region to target geography"}

6. error
   Use when the query is unclear, unrelated to cloud infrastructure, or cannot be mapped.
   Put helpful suggestions in the reason.
   {"action": "error", "reason": "Explanation with suggestions"}"#;

const RULES: &str = "\
CRITICAL RULES:
- Only use region codes from the available list above.
- Continent queries use the primary hubs: Europe -> [eu-west-1, eu-central-1], \
Asia -> [ap-northeast-1, ap-southeast-1], US/America -> [us-east-1, us-west-2].
- Map places to codes: Ireland/Dublin -> eu-west-1, Tokyo -> ap-northeast-1, \
Seoul -> ap-northeast-2, Mumbai/India -> ap-south-1, Singapore -> ap-southeast-1, \
Sydney -> ap-southeast-2, Sao Paulo/Brazil -> sa-east-1.
- ONE specific location -> camera_fly.
- TWO locations joined by connecting words (\"between\", \"and\", \"to\") -> compare_regions.
- If ambiguous, prefer highlight_regions over error.
- Keep the reason to 1-2 sentences.
- Respond with ONLY valid JSON. No markdown, no code fences, no extra text.";

/// The fixed instruction sent with every query.
///
/// Built once from the catalog; it describes every region, the geographic clusters, the
/// action taxonomy with its JSON shapes, and the disambiguation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction {
    text: String,
}

impl SystemInstruction {
    pub fn build(catalog: &RegionCatalog) -> Self {
        let mut text = String::with_capacity(4096);
        text.push_str(PREAMBLE);
        text.push_str("\n\nAVAILABLE REGIONS:\n");
        for region in catalog.iter() {
            let _ = writeln!(
                text,
                "{} ({}, {}): {} AZs",
                region.code,
                region.display_name,
                region.country,
                region.az_count()
            );
        }

        text.push_str("\nGEOGRAPHIC CLUSTERS:\n");
        for cluster in GEO_CLUSTERS {
            let codes: Vec<&str> = cluster
                .codes
                .iter()
                .copied()
                .filter(|code| catalog.contains(code))
                .collect();
            if !codes.is_empty() {
                let _ = writeln!(text, "- {}: {}", cluster.name, codes.join(", "));
            }
        }

        text.push('\n');
        text.push_str(ACTIONS);
        text.push_str("\n\n");
        text.push_str(RULES);
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
