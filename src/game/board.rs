//! Static board catalog: the 40 positions every game is stamped from.
//! Pure data; per-game `TileRecord`s carry the mutable ownership state.

use uuid::Uuid;

use crate::game::types::{ColorGroup, TileKind, TileRecord, TILE_SCHEMA_VERSION};

/// One catalog entry. Monetary fields are zero for tiles that cannot be
/// bought or rented.
#[derive(Debug, Clone, Copy)]
pub struct TileDef {
    pub name: &'static str,
    pub kind: TileKind,
    pub group: Option<ColorGroup>,
    pub price: i64,
    pub rent: i64,
    pub rent_with_set: i64,
    pub rent_with_houses: [i64; 4],
    pub rent_with_hotel: i64,
    pub house_cost: i64,
}

const fn street(
    name: &'static str,
    group: ColorGroup,
    price: i64,
    rent: i64,
    rent_with_houses: [i64; 4],
    rent_with_hotel: i64,
    house_cost: i64,
) -> TileDef {
    TileDef {
        name,
        kind: TileKind::Property,
        group: Some(group),
        price,
        rent,
        rent_with_set: rent * 2,
        rent_with_houses,
        rent_with_hotel,
        house_cost,
    }
}

const fn railroad(name: &'static str) -> TileDef {
    TileDef {
        name,
        kind: TileKind::Railroad,
        group: None,
        price: 200,
        rent: 25,
        rent_with_set: 0,
        rent_with_houses: [0; 4],
        rent_with_hotel: 0,
        house_cost: 0,
    }
}

const fn utility(name: &'static str) -> TileDef {
    TileDef {
        name,
        kind: TileKind::Utility,
        group: None,
        price: 150,
        rent: 0,
        rent_with_set: 0,
        rent_with_houses: [0; 4],
        rent_with_hotel: 0,
        house_cost: 0,
    }
}

const fn marker(name: &'static str, kind: TileKind) -> TileDef {
    TileDef {
        name,
        kind,
        group: None,
        price: 0,
        rent: 0,
        rent_with_set: 0,
        rent_with_houses: [0; 4],
        rent_with_hotel: 0,
        house_cost: 0,
    }
}

/// The full board, indexed by position.
pub const BOARD: [TileDef; 40] = [
    marker("Go", TileKind::Go),
    street("Mediterranean Avenue", ColorGroup::Brown, 60, 2, [10, 30, 90, 160], 250, 50),
    marker("Community Chest", TileKind::CommunityChest),
    street("Baltic Avenue", ColorGroup::Brown, 60, 4, [20, 60, 180, 320], 450, 50),
    marker("Income Tax", TileKind::Tax),
    railroad("Reading Railroad"),
    street("Oriental Avenue", ColorGroup::LightBlue, 100, 6, [30, 90, 270, 400], 550, 50),
    marker("Chance", TileKind::Chance),
    street("Vermont Avenue", ColorGroup::LightBlue, 100, 6, [30, 90, 270, 400], 550, 50),
    street("Connecticut Avenue", ColorGroup::LightBlue, 120, 8, [40, 100, 300, 450], 600, 50),
    marker("Jail", TileKind::Jail),
    street("St. Charles Place", ColorGroup::Pink, 140, 10, [50, 150, 450, 625], 750, 100),
    utility("Electric Company"),
    street("States Avenue", ColorGroup::Pink, 140, 10, [50, 150, 450, 625], 750, 100),
    street("Virginia Avenue", ColorGroup::Pink, 160, 12, [60, 180, 500, 700], 900, 100),
    railroad("Pennsylvania Railroad"),
    street("St. James Place", ColorGroup::Orange, 180, 14, [70, 200, 550, 750], 950, 100),
    marker("Community Chest", TileKind::CommunityChest),
    street("Tennessee Avenue", ColorGroup::Orange, 180, 14, [70, 200, 550, 750], 950, 100),
    street("New York Avenue", ColorGroup::Orange, 200, 16, [80, 220, 600, 800], 1000, 100),
    marker("Free Parking", TileKind::FreeParking),
    street("Kentucky Avenue", ColorGroup::Red, 220, 18, [90, 250, 700, 875], 1050, 150),
    marker("Chance", TileKind::Chance),
    street("Indiana Avenue", ColorGroup::Red, 220, 18, [90, 250, 700, 875], 1050, 150),
    street("Illinois Avenue", ColorGroup::Red, 240, 20, [100, 300, 750, 925], 1100, 150),
    railroad("B&O Railroad"),
    street("Atlantic Avenue", ColorGroup::Yellow, 260, 22, [110, 330, 800, 975], 1150, 150),
    street("Ventnor Avenue", ColorGroup::Yellow, 260, 22, [110, 330, 800, 975], 1150, 150),
    utility("Water Works"),
    street("Marvin Gardens", ColorGroup::Yellow, 280, 24, [120, 360, 850, 1025], 1200, 150),
    marker("Go To Jail", TileKind::GoToJail),
    street("Pacific Avenue", ColorGroup::Green, 300, 26, [130, 390, 900, 1100], 1275, 200),
    street("North Carolina Avenue", ColorGroup::Green, 300, 26, [130, 390, 900, 1100], 1275, 200),
    marker("Community Chest", TileKind::CommunityChest),
    street("Pennsylvania Avenue", ColorGroup::Green, 320, 28, [150, 450, 1000, 1200], 1400, 200),
    railroad("Short Line"),
    marker("Chance", TileKind::Chance),
    street("Park Place", ColorGroup::DarkBlue, 350, 35, [175, 500, 1100, 1300], 1500, 200),
    marker("Luxury Tax", TileKind::Tax),
    street("Boardwalk", ColorGroup::DarkBlue, 400, 50, [200, 600, 1400, 1700], 2000, 200),
];

/// Stamp the catalog into per-game tile records: fresh ownership, no
/// buildings, no mortgages.
pub fn stamp(game_id: Uuid) -> Vec<TileRecord> {
    BOARD
        .iter()
        .enumerate()
        .map(|(position, def)| TileRecord {
            game_id,
            position: position as u8,
            name: def.name.to_string(),
            kind: def.kind,
            color_group: def.group,
            price: def.price,
            rent: def.rent,
            rent_with_set: def.rent_with_set,
            rent_with_houses: def.rent_with_houses,
            rent_with_hotel: def.rent_with_hotel,
            house_cost: def.house_cost,
            houses: 0,
            hotels: 0,
            owner_id: None,
            is_mortgaged: false,
            schema_version: TILE_SCHEMA_VERSION,
        })
        .collect()
}
