use once_cell::sync::Lazy;
use regex::Regex;

pub mod knowledge;

pub use knowledge::KnowledgeBase;

use knowledge::{DiseaseEntry, SymptomRule};

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(hello|hi|hey|hii|helo|namaste|good morning|good evening|good afternoon|how are you|what can you do|who are you)\b",
    )
    .expect("invalid greeting pattern")
});

static GRATITUDE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(thank|thanks|good|great|helpful|nice|awesome|perfect)\b")
        .expect("invalid gratitude pattern")
});

static IRRIGATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(water|irrigat|drip|sprinkler)\b").expect("invalid irrigation pattern")
});

static SPRAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(spray|spraying|schedule|program)\b").expect("invalid spray pattern")
});

const GREETING_REPLY: &str = "👋 **Hello! I'm CropGuard AI Advisor.**\n\nI can help you with:\n• 🌿 Crop-specific growing advice (tomato, lemon, wheat, rice, etc.)\n• 🔬 Disease diagnosis and treatment\n• 🐛 Pest identification and control\n• 💧 Irrigation and soil health\n• 🌾 Fertilizer and nutrition tips\n\nJust describe your problem naturally — like \"my tomato leaves are yellowing\" or \"lemon fruits are very small\" — and I'll help!";

const GRATITUDE_REPLY: &str = "😊 Happy to help! Feel free to ask any other farming question — I'm here whenever you need crop advice.";

const IRRIGATION_REPLY: &str = "💧 **Irrigation Guide:**\n\nAvoid overhead irrigation — wet foliage promotes fungal diseases like Blight and Mildew.\n\n• **Drip irrigation** is best for vegetables — delivers water at root zone\n• Water early morning so leaves dry by afternoon\n• Waterlogged soil causes Root Rot — ensure proper drainage\n• During fruiting, keep consistent moisture to prevent blossom-end rot and cracking\n\n💡 Mulching with straw or plastic reduces water needs by 30–40%.";

const SPRAY_REPLY: &str = "📅 **Spray Schedule for Healthy Crops:**\n\n• **Preventive:** Spray Mancozeb or Copper Oxychloride every 10–14 days in humid/rainy season\n• **After rain:** Always spray fungicide within 24–48 hours of heavy rain\n• **Insecticide:** Rotate between chemical classes to prevent resistance\n• **Avoid spraying:** In midday heat (causes leaf burn), or just before rain\n• **Best time to spray:** Early morning or evening when temperature is below 30°C\n\n🌿 Switch to neem oil (5 ml/L) every 3rd spray to reduce pesticide load.";

const FALLBACK_REPLY: &str = "🤔 **I need a bit more detail to help you.**\n\nHere are some ways to ask me questions:\n\n• **Disease:** 'What is late blight?' or 'How to treat powdery mildew?'\n• **Symptom:** 'My tomato leaves are yellowing' or 'Wheat has orange spots'\n• **Crop advice:** 'How to grow lemons?' or 'Potato growing tips'\n• **Pests:** 'How to control aphids on chilli?'\n• **Soil/Water:** 'How often to water tomatoes?'\n\nDescribe what you're seeing in your field and I'll do my best to diagnose it!";

/// Map one free-text question to exactly one canned markdown reply.
///
/// Rules run in fixed order and the first full match wins; the closing
/// fallback makes this total, so every input (including empty) gets a reply.
pub fn generate_response(kb: &KnowledgeBase, input: &str) -> String {
    let q = input.trim().to_lowercase();

    // 1. Greetings
    if GREETING_RE.is_match(&q) {
        return GREETING_REPLY.to_string();
    }

    // 2. Thanks / compliments
    if GRATITUDE_RE.is_match(&q) {
        return GRATITUDE_REPLY.to_string();
    }

    // 3. Crop mention, optionally combined with a symptom
    for crop in &kb.crops {
        if q.contains(crop.crop.as_str()) {
            if let Some(rule) = first_symptom_match(&kb.symptoms, &q) {
                // Symptom answer first, then the crop-specific guide
                return format!("{}\n\n---\n{}", rule.response, crop.advice);
            }
            return crop.advice.clone();
        }
    }

    // 4. Symptom only, no crop named
    if let Some(rule) = first_symptom_match(&kb.symptoms, &q) {
        return rule.response.clone();
    }

    // 5. Disease database
    for disease in &kb.diseases {
        if disease_matches(&disease.name, &q) {
            return disease_reply(disease, &q);
        }
    }

    // 6. Topic catch-alls
    if IRRIGATION_RE.is_match(&q) {
        return IRRIGATION_REPLY.to_string();
    }
    if SPRAY_RE.is_match(&q) {
        return SPRAY_REPLY.to_string();
    }

    // 7. Bare crop-name mention without an advice-table hit above
    if let Some(name) = kb.crop_names.iter().find(|name| q.contains(name.as_str())) {
        if let Some(crop) = kb.crops.iter().find(|crop| crop.crop == **name) {
            return crop.advice.clone();
        }
    }

    FALLBACK_REPLY.to_string()
}

fn first_symptom_match<'a>(rules: &'a [SymptomRule], q: &str) -> Option<&'a SymptomRule> {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| q.contains(kw.as_str())))
}

/// A disease matches when its lowercased name is a substring of the input,
/// or any word of the name longer than three characters is.
fn disease_matches(name: &str, q: &str) -> bool {
    let key = name.to_lowercase();
    q.contains(key.as_str()) || key.split(' ').any(|word| word.len() > 3 && q.contains(word))
}

fn disease_reply(disease: &DiseaseEntry, q: &str) -> String {
    if contains_any(q, &["cause", "why", "reason"]) {
        return format!("🔬 **{} — Causes:**\n\n{}", disease.name, disease.causes);
    }
    if contains_any(q, &["organic", "natural", "home"]) {
        return format!(
            "🌿 **{} — Organic Treatment:**\n\n{}",
            disease.name, disease.organic
        );
    }
    if contains_any(q, &["chemical", "fungicide", "spray", "pesticide"]) {
        return format!(
            "💊 **{} — Chemical Treatment:**\n\n{}",
            disease.name, disease.chemical
        );
    }
    if contains_any(q, &["treat", "cure", "fix", "control", "prevent"]) {
        return format!(
            "💊 **{} — Treatment Options:**\n\n🌿 **Organic:** {}\n\n💊 **Chemical:** {}",
            disease.name, disease.organic, disease.chemical
        );
    }
    format!(
        "ℹ️ **{}:**\n\n{}\n\n**Causes:** {}\n\n💊 **Treatment:** {}",
        disease.name, disease.info, disease.causes, disease.chemical
    )
}

fn contains_any(q: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| q.contains(needle))
}
