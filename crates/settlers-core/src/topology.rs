//! Fixed board topology built from ring-index arithmetic.
//!
//! The standard board is a centre hex surrounded by two rings (1 + 6 + 12 = 19
//! hexes). Rather than special-casing every cell, each ring is generated by
//! iterating over its six sectors and rotating a direction template by the
//! sector number, which captures the six-fold symmetry of the grid.
//!
//! Index layout:
//! - Hexes: 0 is the centre, 1..=6 the inner ring, 7..=18 the outer ring
//!   (odd = edge-of-ring hexes, even = corner hexes).
//! - Vertices: 0..=5 around the centre, 6..=23 the middle band, 24..=53 the coast.
//! - Edges: 0..=41 inland, 42..=71 the coastline.

use serde::{Deserialize, Serialize};

/// Index of a hex in the board arena
pub type HexIndex = usize;

/// Index of a vertex in the board arena
pub type VertexIndex = usize;

/// Index of an edge in the board arena
pub type EdgeIndex = usize;

/// Number of hexes on the board
pub const HEX_COUNT: usize = 19;

/// Number of vertices on the board
pub const VERTEX_COUNT: usize = 54;

/// Number of edges on the board
pub const EDGE_COUNT: usize = 72;

/// The first edge index on the coastline. Every edge from here on borders exactly one hex.
pub const FIRST_COASTAL_EDGE: EdgeIndex = 42;

/// Compass slot of an edge leaving a vertex, or of a vertex around a hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexSlot {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl VertexSlot {
    /// All slots in clockwise order starting from North
    pub const ALL: [VertexSlot; 6] = [
        VertexSlot::North,
        VertexSlot::NorthEast,
        VertexSlot::SouthEast,
        VertexSlot::South,
        VertexSlot::SouthWest,
        VertexSlot::NorthWest,
    ];
}

/// Compass slot of a neighbouring hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexSlot {
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
}

impl HexSlot {
    /// All slots in clockwise order starting from NorthEast
    pub const ALL: [HexSlot; 6] = [
        HexSlot::NorthEast,
        HexSlot::East,
        HexSlot::SouthEast,
        HexSlot::SouthWest,
        HexSlot::West,
        HexSlot::NorthWest,
    ];

    /// The slot pointing back from the neighbour
    pub fn opposite(self) -> HexSlot {
        HexSlot::ALL[(self as usize + 3) % 6]
    }
}

/// Whether an edge lies on the coastline
pub fn is_coastal(edge: EdgeIndex) -> bool {
    (FIRST_COASTAL_EDGE..EDGE_COUNT).contains(&edge)
}

/// Rotate a slot template right by `sector` positions.
///
/// Sector `i` of a ring is sector 0 turned `i` sixths clockwise, so the slot that
/// held an index in sector 0 moves `i` places along.
fn rotated<T, const N: usize>(mut template: [T; N], sector: usize) -> [T; N] {
    template.rotate_right(sector % N);
    template
}

/// The raw adjacency arrays. Built once; [`crate::board::Board`] copies them into
/// its hexes, vertices and edges.
#[derive(Debug, Clone)]
pub(crate) struct Topology {
    pub hex_neighbours: [[Option<HexIndex>; 6]; HEX_COUNT],
    pub hex_vertices: [[VertexIndex; 6]; HEX_COUNT],
    pub vertex_edges: [[Option<EdgeIndex>; 6]; VERTEX_COUNT],
    pub edge_vertices: [[VertexIndex; 2]; EDGE_COUNT],
}

impl Topology {
    /// Build the canonical board graph
    pub fn build() -> Self {
        let mut builder = Builder {
            topology: Topology {
                hex_neighbours: [[None; 6]; HEX_COUNT],
                hex_vertices: [[0; 6]; HEX_COUNT],
                vertex_edges: [[None; 6]; VERTEX_COUNT],
                edge_vertices: [[0; 2]; EDGE_COUNT],
            },
            next_edge: 0,
        };

        builder.link_hexes();
        builder.assign_hex_vertices();
        builder.link_edges();

        debug_assert_eq!(builder.next_edge, EDGE_COUNT);
        builder.topology
    }
}

struct Builder {
    topology: Topology,
    next_edge: EdgeIndex,
}

impl Builder {
    fn link_hexes(&mut self) {
        let hexes = &mut self.topology.hex_neighbours;

        hexes[0] = [1, 2, 3, 4, 5, 6].map(Some);

        // Inner ring
        for i in 0..6 {
            let template = [
                i * 2 + 8,           // corner
                (i + 1) % 6 * 2 + 7, // outer edge hex, clockwise
                (i + 1) % 6 + 1,     // clockwise neighbour
                0,                   // centre
                (i + 5) % 6 + 1,     // anticlockwise neighbour
                i * 2 + 7,           // outer edge hex, anticlockwise
            ];
            hexes[i + 1] = rotated(template.map(Some), i);
        }

        // Outer ring: one edge hex and one corner hex per sector
        for i in 0..6 {
            let edge_hex = [
                None,
                Some(2 * i + 8),
                Some(i + 1),
                Some((i + 5) % 6 + 1),
                Some((i + 5) % 6 * 2 + 8),
                None,
            ];
            let corner_hex = [
                None,
                None,
                Some((i + 1) % 6 * 2 + 7),
                Some(i + 1),
                Some(2 * i + 7),
                None,
            ];
            hexes[2 * i + 7] = rotated(edge_hex, i);
            hexes[2 * i + 8] = rotated(corner_hex, i);
        }
    }

    fn assign_hex_vertices(&mut self) {
        let verts = &mut self.topology.hex_vertices;

        verts[0] = [0, 1, 2, 3, 4, 5];

        for i in 0..6 {
            let template = [
                i * 3 + 7,
                i * 3 + 8,
                (i + 1) % 6 * 3 + 6,
                (i + 1) % 6,
                i,
                i * 3 + 6,
            ];
            verts[i + 1] = rotated(template, i);
        }

        for i in 0..6 {
            let edge_hex = [
                i * 5 + 25,
                i * 5 + 26,
                i * 3 + 7,
                i * 3 + 6,
                (i + 5) % 6 * 3 + 8,
                i * 5 + 24,
            ];
            let corner_hex = [
                i * 5 + 27,
                i * 5 + 28,
                (i + 1) % 6 * 5 + 24,
                i * 3 + 8,
                i * 3 + 7,
                i * 5 + 26,
            ];
            verts[2 * i + 7] = rotated(edge_hex, i);
            verts[2 * i + 8] = rotated(corner_hex, i);
        }
    }

    fn link_edges(&mut self) {
        // Around the centre hex
        for i in 0..6 {
            self.connect(i, i + 2, (i + 1) % 6, i + 5);
        }
        // Spokes from the centre to the middle band
        for i in 0..6 {
            self.connect(i, i, i * 3 + 6, i + 3);
        }
        // Middle band
        for i in 0..6 {
            self.connect(i * 3 + 6, i + 1, i * 3 + 7, i + 4);
            self.connect(i * 3 + 7, i + 2, i * 3 + 8, i + 5);
            self.connect(i * 3 + 8, i + 3, (i + 1) % 6 * 3 + 6, i);
        }
        // Spokes from the middle band to the coast
        for i in 0..6 {
            self.connect(i * 3 + 7, i, i * 5 + 26, i + 3);
            self.connect(i * 3 + 8, i + 1, (i + 1) % 6 * 5 + 24, i + 4);
        }
        // Coastline
        for i in 0..6 {
            self.connect(i * 5 + 24, i + 1, i * 5 + 25, i + 4);
            self.connect(i * 5 + 25, i + 2, i * 5 + 26, i + 5);
            self.connect(i * 5 + 26, i + 1, i * 5 + 27, i + 4);
            self.connect(i * 5 + 27, i + 2, i * 5 + 28, i + 5);
            self.connect(i * 5 + 28, i + 3, (i + 1) % 6 * 5 + 24, i);
        }
    }

    /// Create the next edge between `a` and `b`, recording it in slot `slot_a`
    /// of `a` and `slot_b` of `b` (both taken modulo 6).
    fn connect(&mut self, a: VertexIndex, slot_a: usize, b: VertexIndex, slot_b: usize) {
        let edge = self.next_edge;
        self.topology.edge_vertices[edge] = [a, b];

        for (vertex, slot) in [(a, slot_a % 6), (b, slot_b % 6)] {
            let entry = &mut self.topology.vertex_edges[vertex][slot];
            debug_assert!(entry.is_none(), "vertex {vertex} slot {slot} linked twice");
            *entry = Some(edge);
        }

        self.next_edge += 1;
    }
}
