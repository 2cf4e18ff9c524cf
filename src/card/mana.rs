use lazy_static::lazy_static;
use regex::Regex;

use crate::distribution::Color;

lazy_static! {
    static ref PLAIN_SYMBOL: Regex = Regex::new(r"\{([WUBRG])\}").unwrap();
    static ref HYBRID_SYMBOL: Regex = Regex::new(r"\{([WUBRG2])/([WUBRG2])\}").unwrap();
}

fn push_symbol(colors: &mut Vec<Color>, symbol: &str) {
    if let Some(color) = symbol.chars().next().and_then(Color::from_symbol) {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
}

/// Colors named by a mana cost such as `{2}{W}{U/B}`.
///
/// Plain colored symbols come first, then both halves of hybrid symbols;
/// the generic `2` in `{2/W}` contributes nothing. Only upper-case WUBRG
/// symbols count, so `{g}` or phyrexian `{B/P}` are ignored.
pub fn colors_from_mana_cost(mana_cost: &str) -> Vec<Color> {
    let mut colors = Vec::new();

    for capture in PLAIN_SYMBOL.captures_iter(mana_cost) {
        push_symbol(&mut colors, &capture[1]);
    }
    for capture in HYBRID_SYMBOL.captures_iter(mana_cost) {
        push_symbol(&mut colors, &capture[1]);
        push_symbol(&mut colors, &capture[2]);
    }

    colors
}
