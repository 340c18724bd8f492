//! Classification rule table
//!
//! Keyword expressions that were used when the dataset was labeled. The table
//! is reference material shown to users; posts are never re-classified
//! against it; the `tags` column is authoritative.

use std::fmt;

use once_cell::sync::Lazy;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::tags::quote_literal;

/// Label given to posts no specific rule matched
pub const CATCH_ALL_LABEL: &str = "Autre";

/// Boolean expression over case-sensitive substring tests on a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Contains(&'static str),
    ContainsAny(Vec<&'static str>),
    ContainsAll(Vec<&'static str>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    /// Catch-all: decided at labeling time when nothing else matched
    NoMatch,
}

impl Expr {
    fn is_compound(&self) -> bool {
        matches!(self, Expr::And(_) | Expr::Or(_))
    }
}

fn keyword_list(f: &mut fmt::Formatter<'_>, keywords: &[&str]) -> fmt::Result {
    let quoted: Vec<String> = keywords.iter().map(|k| quote_literal(k)).collect();
    write!(f, "[{}]", quoted.join(", "))
}

fn join(f: &mut fmt::Formatter<'_>, parts: &[Expr], op: &str, wrap: fn(&Expr) -> bool) -> fmt::Result {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        if wrap(part) {
            write!(f, "({})", part)?;
        } else {
            write!(f, "{}", part)?;
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Contains(keyword) => f.write_str(&quote_literal(keyword)),
            Expr::ContainsAny(keywords) => {
                f.write_str("any of ")?;
                keyword_list(f, keywords)
            }
            Expr::ContainsAll(keywords) => {
                f.write_str("all of ")?;
                keyword_list(f, keywords)
            }
            Expr::Not(inner) if inner.is_compound() => write!(f, "not ({})", inner),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::And(parts) => join(f, parts, "and", |e| matches!(e, Expr::Or(_))),
            Expr::Or(parts) => join(f, parts, "or", |e| matches!(e, Expr::And(_))),
            Expr::NoMatch => f.write_str("(no match)"),
        }
    }
}

/// One labeled rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub label: &'static str,
    pub expr: Expr,
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Rule", 2)?;
        state.serialize_field("label", self.label)?;
        state.serialize_field("expression", &self.expr.to_string())?;
        state.end()
    }
}

/// "Show all" / "pick specific labels" toggle
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleSelection {
    #[serde(default)]
    pub show_all: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Ordered label → expression table
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

static BUILTIN: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    rules: builtin_rules(),
});

impl RuleTable {
    /// The labeling rules the dataset was produced with
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.label)
    }

    pub fn get(&self, label: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.label == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules to display for a selection
    ///
    /// `show_all` wins; otherwise the picked labels in the order given, with
    /// unknown labels skipped. Nothing picked → nothing shown.
    pub fn select(&self, selection: &RuleSelection) -> Vec<&Rule> {
        if selection.show_all {
            return self.rules.iter().collect();
        }
        selection
            .labels
            .iter()
            .filter_map(|label| self.get(label))
            .collect()
    }
}

fn has(keyword: &'static str) -> Expr {
    Expr::Contains(keyword)
}

fn any(keywords: &[&'static str]) -> Expr {
    Expr::ContainsAny(keywords.to_vec())
}

fn all(keywords: &[&'static str]) -> Expr {
    Expr::ContainsAll(keywords.to_vec())
}

fn not(expr: Expr) -> Expr {
    Expr::Not(Box::new(expr))
}

fn and(parts: Vec<Expr>) -> Expr {
    Expr::And(parts)
}

fn or(parts: Vec<Expr>) -> Expr {
    Expr::Or(parts)
}

fn rule(label: &'static str, expr: Expr) -> Rule {
    Rule { label, expr }
}

fn builtin_rules() -> Vec<Rule> {
    const CLASSES: &[&str] = &[
        "ecaflip", "sacrieur", "sadi", "forgelance", "roublard", "enutrof", "enu", "sram", "cra",
        "pandawa", "xelor", "sacri", "élio", "éniripsa", "ougi", "osa", "zobal",
    ];

    vec![
        rule(
            "Eklames dans craft potion",
            any(&["eklame", "éklame", "ekhlame", "eclame", "potion"]),
        ),
        rule(
            "Équilibrage des classes",
            or(vec![
                and(vec![any(&["équilibrage", "equilibrage"]), has("classe")]),
                and(vec![any(&["nerf", "revalorise", " up ", "refonte"]), any(CLASSES)]),
            ]),
        ),
        rule("compensations", any(&["dedomaton", "rollback", "compensation"])),
        rule(
            "Mode héros",
            and(vec![
                any(&["mode héro", "dofus hero", "mode hero"]),
                not(has("héroïque")),
            ]),
        ),
        rule(
            "Séparation pvp & pvm",
            and(vec![
                any(&["pvp", "pvm"]),
                any(&["sépar", "différen", "dissoci", "distinct", "équilibrage sur"]),
            ]),
        ),
        rule(
            "quête Dofus Ocre / craft PDA",
            and(vec![any(&["archis", "ocre", "pda", "moisson"]), not(has("médiocre"))]),
        ),
        rule(
            "Bots",
            any(&["bots", "botting", "professionels du kama", "triche", "les bot"]),
        ),
        rule(
            "drops rares en combat",
            or(vec![
                all(&["combat", "rare"]),
                and(vec![has("drop"), any(&["rare", "très bas"])]),
            ]),
        ),
        rule("drops des dofus", and(vec![any(&["drop", "loot"]), has("dofus")])),
        rule(
            "Debug / performance",
            or(vec![
                any(&["bug", "buuug", "fuite", " lag", "tester", "crash", "freeze"]),
                and(vec![has("auto"), any(&["follow", "pilote"])]),
            ]),
        ),
        rule(
            "anciennes maps de combat",
            or(vec![has("cartes de combat"), all(&["map", " de combat"])]),
        ),
        rule("Mafias pépites/pl", and(vec![has("mafia"), any(&["pépites", " pl"])])),
        rule("rework songes", has("songes")),
        rule(
            "Génération de pépites",
            and(vec![any(&["génér", "annulez"]), any(&["pépite", "pepite"])]),
        ),
        rule("combats de quêtes", all(&["combat", "quête"])),
        rule(
            "Rework AVA",
            and(vec![
                any(&["mode ava", "en ava", "de l'ava", "d'ava"]),
                not(any(&["mode avan", "en avan", "de l'avan", "d'avan"])),
            ]),
        ),
        rule("mode créature", any(&["mode créature", "mode creature"])),
        rule(
            "changelogs plus exhaustifs / complets",
            any(&["changelog", "patchnote", "liste de change", "donner des explications"]),
        ),
        rule("bestiaire par défaut sur la zone", all(&["encyclopédie", "zone"])),
        rule(
            "Besoin de sites externes (DofusNoob)",
            or(vec![all(&["dofus", "noob"]), has("sites annexes")]),
        ),
        rule("retour upvotes/downvotes sur Forum Dofus)", all(&["forum", "vote"])),
        rule(
            "Plus de Communication directement en jeu",
            or(vec![
                and(vec![any(&["communica", "info"]), has("en jeu")]),
                has("arrêter x"),
            ]),
        ),
        rule("Améliorations des Interface", any(&["interface", "hdv"])),
        rule(
            "Améliorer Kolizéum (recompenses, matchmaking, etc.)",
            and(vec![any(&["améliorer", "refonte"]), has("koli")]),
        ),
        rule("Métiers liés au compte", all(&["métiers", "compte"])),
        rule("Meilleure Modération", any(&["modérat", "modos"])),
        rule("Rework élevage", any(&["muldo", "élevage", "enclos"])),
        rule("Remettre les Traques", has("traque")),
        rule(
            "Rework vieux contenus (quêtes, donjons, etc.)",
            or(vec![
                has("donjons demandant des recherches"),
                all(&["refonte", "quêtes"]),
            ]),
        ),
        rule("Fusion Kolizeum (pionner/historique)", all(&["fusion kolizeum", "pionnier"])),
        rule("rework Forgemagie", any(&["fm", "forgemagie"])),
        rule(
            "Rework guildes/Alliances",
            and(vec![
                any(&["guilde", "alliance"]),
                any(&["amélioration", "revalorisation", "supprimer", "redonner", "intérêt", "revoir"]),
            ]),
        ),
        rule(
            "fonctionnalité communautaires (Recherche de groupe/mercenariat)",
            and(vec![has("groupe"), any(&["recherche", "communautaire"])]),
        ),
        rule("Rework Percepteurs", has("percepteur")),
        rule("Direction artistique", has("la da ")),
        rule(
            "action sur le PL (encadrement, interdiction, etc)",
            any(&["le pl ", "du pl ", "glementation du pl", "le pl.", "les pratique pl"]),
        ),
        rule("retour Mode tactique", all(&["mode", "tactique"])),
        rule("implémenter Attitudes/emotes etc", any(&["attitude", "emote", "émote"])),
        rule("ajout de tutoriels sur les mécaniques de jeu", has("tutoriel")),
        rule("rework des maisons (housing)", has("housing")),
        rule("manque d'Identité de classe", all(&["identité", "classe"])),
        rule("modulation de niveau (wakfu)", has("modulation")),
        rule(CATCH_ALL_LABEL, Expr::NoMatch),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rendered(label: &str) -> String {
        RuleTable::builtin()
            .get(label)
            .map(|r| r.expr.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_builtin_table_has_unique_labels() {
        let table = RuleTable::builtin();
        assert_eq!(table.len(), 43);
        let unique: HashSet<&str> = table.labels().collect();
        assert_eq!(unique.len(), table.len());
    }

    #[test]
    fn test_catch_all_is_last_and_has_no_keywords() {
        let table = RuleTable::builtin();
        assert_eq!(table.labels().last(), Some(CATCH_ALL_LABEL));
        assert_eq!(table.get(CATCH_ALL_LABEL).unwrap().expr, Expr::NoMatch);
        assert_eq!(rendered(CATCH_ALL_LABEL), "(no match)");
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = RuleTable::builtin();
        assert!(table.contains("Bots"));
        assert!(!table.contains("bots"));
        assert!(!table.contains(""));
    }

    #[test]
    fn test_render_simple_rules() {
        assert_eq!(rendered("rework songes"), "'songes'");
        assert_eq!(
            rendered("compensations"),
            "any of ['dedomaton', 'rollback', 'compensation']"
        );
        assert_eq!(rendered("combats de quêtes"), "all of ['combat', 'quête']");
    }

    #[test]
    fn test_render_negation_and_conjunction() {
        assert_eq!(
            rendered("Mode héros"),
            "any of ['mode héro', 'dofus hero', 'mode hero'] and not 'héroïque'"
        );
        assert_eq!(
            rendered("Rework AVA"),
            "any of ['mode ava', 'en ava', \"de l'ava\", \"d'ava\"] and not any of ['mode avan', 'en avan', \"de l'avan\", \"d'avan\"]"
        );
    }

    #[test]
    fn test_render_parenthesizes_conjunctions_inside_disjunction() {
        assert_eq!(
            rendered("Plus de Communication directement en jeu"),
            "(any of ['communica', 'info'] and 'en jeu') or 'arrêter x'"
        );
        assert!(rendered("Équilibrage des classes")
            .starts_with("(any of ['équilibrage', 'equilibrage'] and 'classe') or (any of"));
    }

    #[test]
    fn test_render_parenthesizes_compound_negation() {
        let expr = not(or(vec![has("a"), has("b")]));
        assert_eq!(expr.to_string(), "not ('a' or 'b')");
    }

    #[test]
    fn test_select_show_all_wins() {
        let table = RuleTable::builtin();
        let selection = RuleSelection {
            show_all: true,
            labels: vec!["Bots".to_string()],
        };
        assert_eq!(table.select(&selection).len(), table.len());
    }

    #[test]
    fn test_select_picked_labels_in_order() {
        let table = RuleTable::builtin();
        let selection = RuleSelection {
            show_all: false,
            labels: vec![
                "rework songes".to_string(),
                "no such label".to_string(),
                "Bots".to_string(),
            ],
        };
        let picked: Vec<&str> = table.select(&selection).iter().map(|r| r.label).collect();
        assert_eq!(picked, vec!["rework songes", "Bots"]);
    }

    #[test]
    fn test_select_nothing_picked() {
        let table = RuleTable::builtin();
        assert!(table.select(&RuleSelection::default()).is_empty());
    }

    #[test]
    fn test_rule_serializes_rendered_expression() {
        let rule = RuleTable::builtin().get("Rework Percepteurs").unwrap();
        let value = serde_json::to_value(rule).unwrap();
        assert_eq!(value["label"], "Rework Percepteurs");
        assert_eq!(value["expression"], "'percepteur'");
    }
}
