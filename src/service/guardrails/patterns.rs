//! Curated English pattern sets behind the guardrail rules
//!
//! These are deliberately plain regular expressions: auditable, deterministic,
//! and known to miss paraphrases and non-English text.

use std::sync::LazyLock;

use regex::Regex;

/// A settled historical or scientific matter whose denial is always false
pub struct DenialTopic {
    pub topic: &'static str,
    pub explanation: &'static str,
    patterns: Vec<Regex>,
    exclusions: Vec<Regex>,
}

impl DenialTopic {
    fn new(
        topic: &'static str,
        explanation: &'static str,
        patterns: &[&str],
        exclusions: &[&str],
    ) -> Self {
        let compile = |p: &&str| Regex::new(&format!("(?i){p}")).unwrap();
        Self {
            topic,
            explanation,
            patterns: patterns.iter().map(compile).collect(),
            exclusions: exclusions.iter().map(compile).collect(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
            && !self.exclusions.iter().any(|e| e.is_match(text))
    }
}

/// Text that talks about denial rather than asserting it
static REPORTED_DENIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(deniers?|denialism|conspiracy theor\w*|the myth that|debunk\w*|falsely (claim|assert|say)\w*)\b|\b(some|many|they|flat[- ]earthers|conspiracists|skeptics|sceptics) (people )?(believe|claim|say|argue|insist|think)\b",
    )
    .unwrap()
});

static DENIAL_TOPICS: LazyLock<Vec<DenialTopic>> = LazyLock::new(|| {
    vec![
        DenialTopic::new(
            "genocide",
            "Historical genocides such as the Holocaust are among the most thoroughly documented events in history, \
             supported by physical evidence, perpetrators' own records, survivor testimony and international court \
             proceedings. Claims denying that they happened are false.",
            &[
                r"\b(holocaust|shoah)\b.{0,60}\b(never happened|didn'?t happen|did not happen|never occurred|hoax|myth|a lie|fabricat\w*|exaggerat\w*|fake|made up|never existed|did not exist|didn'?t exist)\b",
                r"\b(there was )?(no|never an?y?)\s+(holocaust|genocide)\b",
                r"\b(armenian|rwandan|srebrenica|cambodian|bosnian)\b.{0,40}\bgenocide\b.{0,60}\b(never happened|didn'?t happen|did not happen|myth|hoax|a lie|fabricat\w*|not real|never occurred)\b",
                r"\bgas chambers?\b.{0,40}\b(never existed|didn'?t exist|did not exist|fake|hoax|myth)\b",
            ],
            &[],
        ),
        DenialTopic::new(
            "moon_landing",
            "The Apollo crewed Moon landings (1969-1972) are confirmed by hundreds of kilograms of returned lunar samples, \
             retroreflectors still used for laser ranging, independent tracking by other nations and orbital imagery of \
             the landing sites. Claims that they were faked are false.",
            &[
                r"\b(moon landings?|apollo( \d+)?( missions?)?|lunar landings?)\b.{0,60}\b(fake[d]?|hoax|staged|never happened|didn'?t happen|did not happen|filmed (in|on) a (studio|set|sound ?stage)|fabricat\w*|a lie|never occurred)\b",
                r"\b(never|didn'?t|did not|have not|haven'?t)\b.{0,30}\b(land(ed)?|walk(ed)?|set foot|been|go(ne)?|went)\b.{0,20}\b(on|to) the moon\b",
                r"\bno (one|human|man|astronaut)s? (has |have )?(ever )?(landed|walked|been) on the moon\b",
            ],
            &[],
        ),
        DenialTopic::new(
            "evolution",
            "Evolution is supported by overwhelming evidence from genetics, the fossil record, comparative anatomy and \
             direct observation, and is the scientific consensus in biology. Claims denying it are false.",
            &[
                r"\bevolution\b.{0,40}\b(is|was)\b.{0,20}\b(a myth|a lie|a hoax|false|fake|not real|a fraud|just a theory|only a theory|unproven|debunked)\b",
                r"\bevolution\b.{0,30}\b(never happened|isn'?t real|doesn'?t exist|does not exist|didn'?t happen|did not happen)\b",
                r"\b(humans?|people|we|mankind)\b.{0,30}\b(did not|didn'?t|never|do not|don'?t)\b.{0,10}\bevolve",
            ],
            &[r"\bnot (just|only|merely) a theory\b", r"\b(is|was) not (a myth|a lie|a hoax|false|fake|a fraud|unproven)\b"],
        ),
        DenialTopic::new(
            "flat_earth",
            "The Earth is an oblate spheroid, established by direct measurement since antiquity, satellite imagery, \
             circumnavigation and basic physics. Claims that it is flat are false.",
            &[
                r"\b(the )?(earth|world|planet)\b.{0,15}\b(is|was)\b.{0,10}\bflat\b",
                r"\bflat[- ]earth(ers?)?\b.{0,30}\b(is|are)\b.{0,10}\b(right|correct|true|real)\b",
                r"\b(earth|world)\b.{0,20}\b(is not|isn'?t)\b.{0,10}\b(round|a sphere|spherical|a globe)\b",
            ],
            &[r"\b(not|never)\s+flat\b"],
        ),
        DenialTopic::new(
            "vaccine_autism",
            "Large studies covering millions of children have found no link between vaccines and autism, and the 1998 \
             study that claimed one was retracted for fraud. Claims that vaccines cause autism are false.",
            &[
                r"\b(vaccin\w*|mmr|jabs?|immuni[sz]ations?)\b.{0,40}\b(cause[sd]?|causing|lead(s)? to|trigger\w*|linked to|responsible for)\b.{0,20}\bautism\b",
                r"\bautism\b.{0,30}\b(caused|triggered) by\b.{0,20}\b(vaccin\w*|mmr|jabs?|immuni[sz]ations?)\b",
            ],
            &[
                r"\b(do|does|did|could)\s*(not|n'?t)\b",
                r"\b(cannot|can'?t)\b",
                r"\bno (link|evidence|connection|association)\b",
                r"\bnot (linked|caused|responsible)\b",
            ],
        ),
        DenialTopic::new(
            "climate_change",
            "Scientific bodies worldwide, including the IPCC, conclude that current climate change is real and driven \
             primarily by human greenhouse gas emissions. Claims denying human-caused climate change are false.",
            &[
                r"\b(climate change|global warming)\b.{0,30}\b(is|was)\b.{0,15}\b(a hoax|a myth|a scam|a lie|fake|not real|made up|a fraud|natural|not man-?made|not human-?caused)\b",
                r"\b(climate change|global warming)\b.{0,30}\b(isn'?t real|doesn'?t exist|does not exist|is not happening|isn'?t happening|never happened)\b",
                r"\b(humans?|people|mankind|we|co2|carbon dioxide|emissions|fossil fuels)\b.{0,30}\b(do not|don'?t|does not|doesn'?t|are not|aren'?t|is not|isn'?t|cannot|can'?t|have no|has no)\b.{0,20}\b(cause|causing|drive|driving|affect|affecting|influence|effect|impact|responsible)\w*\b.{0,30}\b(climate|warming)\b",
                r"\b(climate change|global warming)\b.{0,30}\b(not|isn'?t)\b.{0,10}\b(caused|driven) by\b.{0,15}\b(humans?|people|us|emissions|co2)\b",
            ],
            &[r"\b(is|was) not (a hoax|a myth|a scam|a lie|fake|made up|a fraud|natural)\b"],
        ),
    ]
});

static INTENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(based\b.{0,40}\b(on|upon)|inspired by|designed to|meant to|intended to|symboli[sz](e|es|ed)|modell?ed\b.{0,40}\b(on|after)|motivated by)\b",
    )
    .unwrap()
});

/// Words that make a statement a matter of values rather than fact
const VALUE_KEYWORDS: &[&str] = &[
    "necessary",
    "unnecessary",
    "justified",
    "unjustified",
    "justifiable",
    "should",
    "shouldn't",
    "ought",
    "fair",
    "unfair",
    "best",
    "worst",
    "greatest",
    "moral",
    "immoral",
    "ethical",
    "unethical",
    "deserve",
    "deserved",
    "deserves",
    "evil",
    "acceptable",
    "unacceptable",
    "overrated",
    "underrated",
    "beautiful",
    "ugly",
];

static VALUE_JUDGMENT: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = VALUE_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).unwrap()
});

static ANCIENT_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jesus|moses|abraham|noah|king david|solomon|buddha|siddhartha|confucius|lao ?tzu|homer|socrates|pythagoras|king arthur|gilgamesh|pharaohs?|ramesses|cleopatra|alexander the great|julius caesar|troy|trojan war|sumerians?|babylonians?|assyrians?|hittites?|minoans?|mycenaeans?|ancient (egypt|greece|rome|china|india)\w*)\b",
    )
    .unwrap()
});

static HISTORICITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(existed|exist|existence|real (person|figure|place|city|event)|historical (figure|person|jesus|existence)|historicity|really lived|actually lived|was real|were real|really happened|actually happened|did exist|lived)\b",
    )
    .unwrap()
});

/// The denial topic the text asserts, if any
pub fn match_denial(text: &str) -> Option<&'static DenialTopic> {
    if REPORTED_DENIAL.is_match(text) {
        return None;
    }
    DENIAL_TOPICS.iter().find(|t| t.matches(text))
}

/// Claims about what someone intended, meant or was inspired by
pub fn has_intent_language(text: &str) -> bool {
    INTENT.is_match(text)
}

/// The first value-judgment keyword in the text, matched as a whole word
pub fn value_judgment_keyword(text: &str) -> Option<String> {
    VALUE_JUDGMENT
        .find(text)
        .map(|m| m.as_str().to_lowercase())
}

/// A named ancient figure or civilisation plus an existence assertion
pub fn is_ancient_historicity_claim(text: &str) -> bool {
    ANCIENT_SUBJECT.is_match(text) && HISTORICITY.is_match(text)
}
