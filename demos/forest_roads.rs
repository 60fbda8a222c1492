use forest_road_network::{
    cell_set, Cell, CostGrid, GenerationMethod, GeoTransform, LogFeedback, NetworkBuilder,
    NetworkConfig,
};

// In this example two stands of forest are connected to an existing road on a 6x8 grid of
// 10 m cells with shape
//  ________
// |RRRRRRRR|
// |  ###   |
// |  #~~#  |
// |   ~~   |
// |S      S|
// |S      S|
//  ________
// where
// - R marks the existing road
// - \# marks no-data cells, which are never crossed
// - ~ marks a wet area, expensive to build on
// - S marks the cells to reach
// The cells to reach are visited farthest first. Once one of them has a road, its neighbour
// lies within skidding distance and needs none.

fn main() {
    let mut rows = vec![vec![Some(1.0); 8]; 6];
    for (row, col) in [(1, 2), (1, 3), (1, 4), (2, 2), (2, 5)] {
        rows[row][col] = None;
    }
    for (row, col) in [(2, 3), (2, 4), (3, 3), (3, 4)] {
        rows[row][col] = Some(20.0);
    }
    let grid = CostGrid::from_rows(rows).unwrap();
    println!("{}", grid);

    let geo = GeoTransform::new(0.0, 60.0, 10.0, 10.0);
    let roads = cell_set((0..8).map(|col| Cell::new(0, col)));
    let to_reach = cell_set([(4, 0), (5, 0), (4, 7), (5, 7)].map(Cell::from));
    let config = NetworkConfig::new(10.0, GenerationMethod::FarthestFirst);
    let network = NetworkBuilder::new(&grid, geo, config)
        .unwrap()
        .build(&to_reach, &roads, &mut LogFeedback)
        .unwrap();

    println!(
        "{} roads, {} cells within skidding distance, total cost {}",
        network.len(),
        network.skipped,
        network.total_cost()
    );
    for road in network.iter() {
        println!("Road {} (cost {}):", road.id, road.total_cost);
        for (cell, [x, y]) in road.cells().iter().zip(road.to_polyline(&geo)) {
            println!("  {} -> ({}, {})", cell, x, y);
        }
    }
}
