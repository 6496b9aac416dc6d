//! JSON layout description: which resource and number sit on each hex and
//! where the ports are. Ownership is never part of a layout.

use crate::board::{Board, Port, Resource, DESERT_DICE_VALUE};
use crate::topology::{is_coastal, EdgeIndex, EDGE_COUNT, HEX_COUNT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One hex of a layout, in hex index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexLayout {
    pub resource: Resource,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortLayout {
    pub resource: Resource,
    pub position: EdgeIndex,
}

/// Everything needed to rebuild a board's fixed features
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub resources: Vec<HexLayout>,
    pub ports: Vec<PortLayout>,
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("expected 19 hexes, got {0}")]
    WrongHexCount(usize),

    #[error("expected exactly one desert, got {0}")]
    DesertCount(usize),

    #[error("hex {hex} has invalid dice value {value}")]
    InvalidDiceValue { hex: usize, value: u8 },

    #[error("port position {0} is not on the board")]
    PortOutOfRange(EdgeIndex),

    #[error("port position {0} is not on the coast")]
    PortNotCoastal(EdgeIndex),

    #[error("two ports on edge {0}")]
    DuplicatePort(EdgeIndex),

    #[error("malformed layout: {0}")]
    Json(#[from] serde_json::Error),
}

impl Layout {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Layout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.resources.len() != HEX_COUNT {
            return Err(LayoutError::WrongHexCount(self.resources.len()));
        }

        let deserts = self
            .resources
            .iter()
            .filter(|h| h.resource == Resource::Desert)
            .count();
        if deserts != 1 {
            return Err(LayoutError::DesertCount(deserts));
        }

        for (hex, tile) in self.resources.iter().enumerate() {
            let valid = if tile.resource == Resource::Desert {
                tile.value == DESERT_DICE_VALUE
            } else {
                (2..=12).contains(&tile.value) && tile.value != DESERT_DICE_VALUE
            };
            if !valid {
                return Err(LayoutError::InvalidDiceValue {
                    hex,
                    value: tile.value,
                });
            }
        }

        let mut seen = [false; EDGE_COUNT];
        for port in &self.ports {
            if port.position >= EDGE_COUNT {
                return Err(LayoutError::PortOutOfRange(port.position));
            }
            if !is_coastal(port.position) {
                return Err(LayoutError::PortNotCoastal(port.position));
            }
            if std::mem::replace(&mut seen[port.position], true) {
                return Err(LayoutError::DuplicatePort(port.position));
            }
        }

        Ok(())
    }
}

impl Board {
    /// Build a board from a layout, with a freshly shuffled development pile
    pub fn from_layout(layout: &Layout) -> Result<Self, LayoutError> {
        let mut rng = rand::thread_rng();
        Self::from_layout_with_rng(layout, &mut rng)
    }

    pub fn from_layout_with_rng<R: Rng>(layout: &Layout, rng: &mut R) -> Result<Self, LayoutError> {
        layout.validate()?;

        let mut board = Self::unassigned(rng);
        for (hex, tile) in board.hexes_mut().iter_mut().zip(&layout.resources) {
            hex.resource = tile.resource;
            hex.dice_value = tile.value;
            hex.has_robber = tile.resource == Resource::Desert;
        }
        for port in &layout.ports {
            board.edge_mut(port.position).port = Some(Port::new(port.resource));
        }

        Ok(board)
    }

    /// Describe this board's resources, numbers and ports
    pub fn encode(&self) -> Layout {
        Layout {
            resources: self
                .hexes()
                .iter()
                .map(|hex| HexLayout {
                    resource: hex.resource,
                    value: hex.dice_value,
                })
                .collect(),
            ports: self
                .edges()
                .iter()
                .enumerate()
                .filter_map(|(position, edge)| {
                    edge.port.map(|port| PortLayout {
                        resource: port.resource,
                        position,
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_layout() -> Layout {
        Board::standard_with_rng(&mut StdRng::seed_from_u64(99)).encode()
    }

    #[test]
    fn test_encode_decode_reproduces_layout() {
        let board = Board::standard_with_rng(&mut StdRng::seed_from_u64(21));
        let layout = board.encode();
        let rebuilt = Board::from_layout(&layout).unwrap();

        assert_eq!(rebuilt.encode(), layout);
        assert_eq!(rebuilt.hexes(), board.hexes());
        assert_eq!(rebuilt.robber_pos(), board.robber_pos());
    }

    #[test]
    fn test_json_uses_upper_case_names() {
        let json = sample_layout().to_json().unwrap();
        assert!(json.contains("\"DESERT\""));
        assert!(json.contains("\"resources\""));
        assert!(json.contains("\"position\""));
        assert!(!json.contains("Desert"));

        let parsed = Layout::from_json(&json).unwrap();
        assert_eq!(parsed, sample_layout());
    }

    #[test]
    fn test_encoding_never_includes_ownership() {
        let mut board = Board::standard_with_rng(&mut StdRng::seed_from_u64(4));
        let before = board.encode();
        board
            .place_settlement(crate::board::Colour::Red, None, 0, false)
            .unwrap();
        assert_eq!(board.encode(), before);
    }

    #[test]
    fn test_rejects_wrong_hex_count() {
        let mut layout = sample_layout();
        layout.resources.pop();
        assert!(matches!(layout.validate(), Err(LayoutError::WrongHexCount(18))));
    }

    #[test]
    fn test_rejects_bad_desert() {
        let mut layout = sample_layout();
        let desert = layout
            .resources
            .iter()
            .position(|h| h.resource == Resource::Desert)
            .unwrap();
        layout.resources[desert].value = 6;
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::InvalidDiceValue { value: 6, .. })
        ));

        let mut layout = sample_layout();
        let other = (desert + 1) % HEX_COUNT;
        layout.resources[other] = HexLayout {
            resource: Resource::Desert,
            value: 7,
        };
        assert!(matches!(layout.validate(), Err(LayoutError::DesertCount(2))));
    }

    #[test]
    fn test_rejects_seven_on_producing_hex() {
        let mut layout = sample_layout();
        let hex = layout
            .resources
            .iter()
            .position(|h| h.resource != Resource::Desert)
            .unwrap();
        layout.resources[hex].value = 7;
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::InvalidDiceValue { value: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_ports() {
        let mut layout = sample_layout();
        layout.ports[0].position = 10;
        assert!(matches!(layout.validate(), Err(LayoutError::PortNotCoastal(10))));

        layout.ports[0].position = 72;
        assert!(matches!(layout.validate(), Err(LayoutError::PortOutOfRange(72))));

        layout.ports[0].position = layout.ports[1].position;
        assert!(matches!(layout.validate(), Err(LayoutError::DuplicatePort(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Layout::from_json("{\"resources\": 3}"),
            Err(LayoutError::Json(_))
        ));
        assert!(matches!(
            Layout::from_json("{\"resources\": [{\"resource\": \"CHEESE\", \"value\": 3}], \"ports\": []}"),
            Err(LayoutError::Json(_))
        ));
    }
}
