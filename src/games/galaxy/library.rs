//! The reference card set.

use crate::core::{CardDesign, CardLibrary, ConsumePower, GoodType};

/// Start worlds, one per possible seat.
fn start_worlds() -> Vec<CardDesign> {
    vec![
        CardDesign::world("Old Earth", 0, 2)
            .with_consume(ConsumePower::goods(1, None, 1, 1))
            .start_world(),
        CardDesign::world("New Sparta", 0, 1)
            .military_world()
            .with_military(2)
            .start_world(),
        CardDesign::world("Epsilon Eridani", 0, 1)
            .with_military(1)
            .with_consume(ConsumePower::goods(1, None, 1, 0))
            .start_world(),
        CardDesign::world("Alpha Centauri", 0, 0)
            .with_good(GoodType::Rare, true)
            .start_world(),
        CardDesign::world("Earth's Lost Colony", 0, 1)
            .with_good(GoodType::Novelty, false)
            .start_world(),
        CardDesign::world("Separatist Colony", 0, 1)
            .military_world()
            .with_military(1)
            .start_world(),
    ]
}

fn worlds() -> Vec<CardDesign> {
    vec![
        CardDesign::world("Spice World", 1, 1)
            .with_good(GoodType::Novelty, false)
            .copies(3),
        CardDesign::world("Pilgrimage World", 2, 2)
            .with_good(GoodType::Novelty, true)
            .copies(2),
        CardDesign::world("Gem World", 2, 1)
            .with_good(GoodType::Rare, false)
            .copies(3),
        CardDesign::world("Mining World", 3, 2)
            .with_good(GoodType::Rare, false)
            .copies(2),
        CardDesign::world("Comet Zone", 3, 2)
            .with_good(GoodType::Rare, false)
            .copies(2),
        CardDesign::world("Refugee World", 0, 1)
            .with_good(GoodType::Novelty, true)
            .copies(2),
        CardDesign::world("Lost Species Ark World", 5, 3)
            .with_good(GoodType::Gene, false)
            .copies(2),
        CardDesign::world("Deserted Alien Library", 6, 5).with_good(GoodType::Alien, false),
        CardDesign::world("Alien Rosetta Stone World", 6, 4).with_good(GoodType::Alien, true),
        CardDesign::world("Tourist World", 4, 4)
            .with_consume(ConsumePower::goods(1, None, 1, 0))
            .copies(2),
        CardDesign::world("Gambling World", 1, 1).with_consume(ConsumePower::ante()),
        CardDesign::world("Aquatic Uplift Race", 2, 2)
            .military_world()
            .with_military(1)
            .copies(2),
        CardDesign::world("Blaster Gem Mines", 3, 1)
            .military_world()
            .with_military(1)
            .with_good(GoodType::Rare, true)
            .copies(2),
        CardDesign::world("Bio-Hazard Mining World", 3, 2)
            .military_world()
            .with_good(GoodType::Gene, false)
            .copies(2),
        CardDesign::world("Rebel Outpost", 5, 5).military_world().copies(2),
        CardDesign::world("Alien Robot Sentry", 4, 2)
            .military_world()
            .with_good(GoodType::Alien, true),
        CardDesign::world("Imperium Seat", 6, 2)
            .military_world()
            .with_military(2)
            .with_prestige(1),
    ]
}

fn developments() -> Vec<CardDesign> {
    vec![
        CardDesign::development("Investment Credits", 1, 1)
            .with_develop_discount()
            .copies(2),
        CardDesign::development("Replicant Robots", 4, 2).with_develop_discount(),
        CardDesign::development("Mining Robots", 2, 1).with_develop_discount(),
        CardDesign::development("New Military Tactics", 1, 1).with_military(1),
        CardDesign::development("Expedition Force", 1, 1)
            .with_military(1)
            .copies(2),
        CardDesign::development("Space Marines", 2, 1)
            .with_military(2)
            .copies(2),
        CardDesign::development("Contact Specialist", 1, 1)
            .with_pay_military()
            .copies(2),
        CardDesign::development("Public Works", 1, 1)
            .with_consume(ConsumePower::hand(1, 1))
            .copies(2),
        CardDesign::development("Consumer Markets", 5, 3)
            .with_consume(ConsumePower::goods(1, Some(GoodType::Novelty), 1, 1)),
        CardDesign::development("Free Trade Association", 4, 2)
            .with_consume(ConsumePower::goods(1, Some(GoodType::Rare), 2, 0)),
        CardDesign::development("Genetics Lab", 3, 1)
            .with_consume(ConsumePower::goods(1, Some(GoodType::Gene), 2, 1)),
        CardDesign::development("Diversified Economy", 4, 2)
            .with_consume(ConsumePower::goods(3, None, 3, 0)),
        CardDesign::development("Galactic Bazaar", 6, 3)
            .with_consume(ConsumePower::goods(2, None, 2, 1)),
        CardDesign::development("Merchant Guild", 4, 2).with_consume(ConsumePower::hand(2, 1)),
        CardDesign::development("Interstellar Bank", 2, 1).copies(2),
        CardDesign::development("Galactic Trendsetters", 5, 2).with_prestige(1),
        CardDesign::development("Pan-Galactic Affluence", 6, 3).with_prestige(2),
        CardDesign::development("Galactic Renaissance", 6, 6),
    ]
}

/// Every design of the reference set.
#[must_use]
pub fn standard() -> CardLibrary {
    let mut library = CardLibrary::new();
    for design in start_worlds().into_iter().chain(worlds()).chain(developments()) {
        library.register(design);
    }
    library
}
