pub mod setup;

pub use setup::{
    all_bonuses, garde_with_petit, round_entry, TarotSetup, TarotSetupBuilder, YahtzeeSetup,
    YahtzeeSetupBuilder,
};
