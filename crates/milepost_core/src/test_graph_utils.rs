#[cfg(test)]
pub mod test_graph {
    use crate::{
        network::{LinkRecord, NetworkSource, RoadDirection, RoadRecord},
        types::NodeId,
    };

    pub const TEST_NETWORK_NODES: usize = 8;
    pub const TEST_NETWORK_LINKS: usize = 14;

    /// The small network bundled under `tests/fixtures`.
    pub fn test_network() -> NetworkSource {
        serde_json::from_str(include_str!("../tests/fixtures/test_network.json"))
            .expect("invalid test network fixture")
    }

    #[derive(Clone, Copy, Debug)]
    pub enum RomaniaGraphCity {
        Arad = 1,
        Bucharest = 2,
        Craiova = 3,
        Dobreta = 4,
        Eforie = 5,
        Fagaras = 6,
        Giurgiu = 7,
        Hirsova = 8,
        Iasi = 9,
        Lugoj = 10,
        Mehadia = 11,
        Neamt = 12,
        Oradea = 13,
        Pitesti = 14,
        RimnicuVilcea = 15,
        Sibiu = 16,
        Timisoara = 17,
        Urziceni = 18,
        Vaslui = 19,
        Zerind = 20,
    }

    impl From<RomaniaGraphCity> for NodeId {
        fn from(value: RomaniaGraphCity) -> Self {
            value as NodeId
        }
    }

    // https://user-images.githubusercontent.com/43790152/97784960-1a142580-1bc4-11eb-9070-39c03eb16df2.png
    fn romania_roads() -> Vec<(RomaniaGraphCity, RomaniaGraphCity, f64)> {
        use RomaniaGraphCity::*;

        vec![
            (Oradea, Zerind, 71.0),
            (Oradea, Sibiu, 151.0),
            (Zerind, Arad, 75.0),
            (Arad, Sibiu, 140.0),
            (Arad, Timisoara, 118.0),
            (Timisoara, Lugoj, 111.0),
            (Lugoj, Mehadia, 70.0),
            (Mehadia, Dobreta, 75.0),
            (Dobreta, Craiova, 120.0),
            (Craiova, RimnicuVilcea, 146.0),
            (Craiova, Pitesti, 138.0),
            (RimnicuVilcea, Pitesti, 97.0),
            (RimnicuVilcea, Sibiu, 80.0),
            (Sibiu, Fagaras, 99.0),
            (Fagaras, Bucharest, 211.0),
            (Pitesti, Bucharest, 101.0),
            (Bucharest, Giurgiu, 90.0),
            (Bucharest, Urziceni, 85.0),
            (Urziceni, Hirsova, 98.0),
            (Hirsova, Eforie, 86.0),
            (Urziceni, Vaslui, 142.0),
            (Vaslui, Iasi, 92.0),
            (Iasi, Neamt, 87.0),
        ]
    }

    /// Two-way roads between Romanian cities, `distance` in kilometers.
    pub fn romania_network() -> NetworkSource {
        let mut source = NetworkSource::new();

        for (road_id, (start, end, distance)) in romania_roads().into_iter().enumerate() {
            source.add_road(
                RoadRecord::new(
                    road_id as u64 + 1,
                    start.into(),
                    end.into(),
                    RoadDirection::Both,
                )
                .with_attribute("distance", distance),
            );
        }

        source
    }

    /// Grid of `width * height` nodes, ids row by row from 0, with links both
    /// ways between neighbours. Costs vary per link so few paths tie.
    pub fn grid_network(width: u64, height: u64) -> NetworkSource {
        let mut source = NetworkSource::new();
        let mut next_link_id = 1;

        let mut connect = |source: &mut NetworkSource, a: NodeId, b: NodeId| {
            let distance = 10.0 + ((a * 7 + b * 13) % 11) as f64;
            let time = distance * 1.5 + (a % 3) as f64;
            source.add_link(
                LinkRecord::new(next_link_id, a, b)
                    .with_attribute("distance", distance)
                    .with_attribute("time", time),
            );
            next_link_id += 1;
        };

        for y in 0..height {
            for x in 0..width {
                let node = y * width + x;
                if x + 1 < width {
                    connect(&mut source, node, node + 1);
                    connect(&mut source, node + 1, node);
                }
                if y + 1 < height {
                    connect(&mut source, node, node + width);
                    connect(&mut source, node + width, node);
                }
            }
        }

        source
    }
}
