use std::sync::atomic::{AtomicUsize, Ordering};

use forest_road_network::{
    build_road_network, cell_set, CancelFlag, Cell, CellSet, Connectivity, CostGrid, Feedback,
    GenerationMethod, GeoTransform, LogFeedback, NetworkBuilder, NetworkConfig, NetworkError,
    RoadNetwork,
};

const METHODS: [GenerationMethod; 3] = [
    GenerationMethod::Random,
    GenerationMethod::ClosestFirst,
    GenerationMethod::FarthestFirst,
];

fn build(
    grid: &CostGrid,
    to_reach: &CellSet,
    roads: &CellSet,
    config: NetworkConfig,
) -> Result<RoadNetwork, NetworkError> {
    build_road_network(
        grid,
        GeoTransform::default(),
        to_reach,
        roads,
        config,
        &mut LogFeedback,
    )
}

/// Cancels once `is_cancelled` has been asked `limit` times.
struct CountingFeedback {
    calls: AtomicUsize,
    limit: usize,
    progress: Vec<f64>,
    infos: Vec<String>,
}

impl CountingFeedback {
    fn new(limit: usize) -> CountingFeedback {
        CountingFeedback {
            calls: AtomicUsize::new(0),
            limit,
            progress: Vec::new(),
            infos: Vec::new(),
        }
    }
}

impl Feedback for CountingFeedback {
    fn is_cancelled(&self) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed) + 1 > self.limit
    }
    fn set_progress(&mut self, percent: f64) {
        self.progress.push(percent);
    }
    fn push_info(&mut self, message: &str) {
        self.infos.push(message.to_owned());
    }
}

#[test]
fn corner_to_corner() {
    let to_reach = cell_set([Cell::new(4, 4)]);
    let roads = cell_set([Cell::new(0, 0)]);
    for (connectivity, cells, cost) in
        [(Connectivity::VonNeumann, 9, 8.0), (Connectivity::Moore, 5, 4.0)]
    {
        let grid = CostGrid::uniform(5, 5, 1.0)
            .unwrap()
            .with_connectivity(connectivity);
        for method in METHODS {
            let network = build(&grid, &to_reach, &roads, NetworkConfig::new(0.0, method)).unwrap();
            assert_eq!(network.len(), 1);
            let road = &network.segments[0];
            assert_eq!(road.id, 1);
            assert_eq!(road.cells().len(), cells);
            assert_eq!(road.total_cost, cost);
            assert_eq!(road.path.start(), Some(Cell::new(4, 4)));
            assert_eq!(road.path.reached, Cell::new(0, 0));
        }
    }
}

#[test]
fn unreachable_cell_fails_the_run() {
    let mut rows = vec![vec![Some(1.0); 7]; 7];
    for i in 1..=5 {
        rows[1][i] = None;
        rows[5][i] = None;
        rows[i][1] = None;
        rows[i][5] = None;
    }
    let grid = CostGrid::from_rows(rows).unwrap();
    let to_reach = cell_set([Cell::new(3, 3)]);
    let roads = cell_set([Cell::new(0, 0)]);
    for method in METHODS {
        let result = build(&grid, &to_reach, &roads, NetworkConfig::new(0.0, method));
        assert_eq!(result, Err(NetworkError::Unreachable(Cell::new(3, 3))));
        assert!(!result.unwrap_err().is_configuration_error());
    }
}

#[test]
fn same_inputs_give_same_network() {
    let grid = CostGrid::new(
        12,
        12,
        (0..144).map(|i| Some(((i * 7) % 5 + 1) as f64)).collect(),
    )
    .unwrap();
    let to_reach = cell_set((0..12).step_by(3).flat_map(|r| [Cell::new(r, 11), Cell::new(11, r)]));
    let roads = cell_set((0..6).map(|c| Cell::new(0, c)));
    for method in METHODS {
        let config = NetworkConfig::new(1.5, method).with_seed(42);
        let first = build(&grid, &to_reach, &roads, config.clone()).unwrap();
        let second = build(&grid, &to_reach, &roads, config).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len() + first.skipped, to_reach.len());
    }
}

#[test]
fn visiting_order_shapes_the_network() {
    // A single row with the road on the left end.
    let grid = CostGrid::uniform(1, 10, 1.0).unwrap();
    let roads = cell_set([Cell::new(0, 0)]);
    let to_reach = cell_set([Cell::new(0, 3), Cell::new(0, 8)]);

    let closest = build(
        &grid,
        &to_reach,
        &roads,
        NetworkConfig::new(0.0, GenerationMethod::ClosestFirst),
    )
    .unwrap();
    let costs: Vec<f64> = closest.iter().map(|s| s.total_cost).collect();
    assert_eq!(costs, vec![3.0, 5.0]);
    // The second road ends on the first one.
    assert_eq!(closest.segments[1].path.reached, Cell::new(0, 3));

    let farthest = build(
        &grid,
        &to_reach,
        &roads,
        NetworkConfig::new(0.0, GenerationMethod::FarthestFirst),
    )
    .unwrap();
    assert_eq!(farthest.len(), 1);
    assert_eq!(farthest.skipped, 1);
    assert_eq!(farthest.total_cost(), 8.0);
    assert_eq!(closest.total_cost(), farthest.total_cost());
    assert_ne!(closest, farthest);
}

#[test]
fn cancelled_run_returns_no_network() {
    let grid = CostGrid::uniform(30, 30, 1.0).unwrap();
    let roads = cell_set([Cell::new(0, 0)]);
    let to_reach = cell_set([Cell::new(29, 29), Cell::new(29, 0)]);
    let builder = NetworkBuilder::new(
        &grid,
        GeoTransform::default(),
        NetworkConfig::new(0.0, GenerationMethod::Random)
            .with_seed(3)
            .with_poll_interval(1),
    )
    .unwrap();

    // The first poll happens on the first frontier pop of the first search.
    let mut feedback = CountingFeedback::new(1);
    let result = builder.build(&to_reach, &roads, &mut feedback);
    assert_eq!(result, Err(NetworkError::Cancelled));
    assert_eq!(feedback.calls.load(Ordering::Relaxed), 2);
    assert!(!feedback.infos.iter().any(|m| m.starts_with("Network created")));

    // A flag raised before the run stops the distance pass of the ordered methods.
    let flag = CancelFlag::new();
    flag.cancel();
    let builder = NetworkBuilder::new(
        &grid,
        GeoTransform::default(),
        NetworkConfig::new(0.0, GenerationMethod::ClosestFirst),
    )
    .unwrap();
    assert_eq!(
        builder.build(&to_reach, &roads, &mut flag.clone()),
        Err(NetworkError::Cancelled)
    );
}

#[test]
fn parallel_ordering_gives_same_network() {
    let grid = CostGrid::new(
        40,
        40,
        (0..1600)
            .map(|i| if i % 37 == 5 { None } else { Some(((i * 13) % 7 + 1) as f64) })
            .collect(),
    )
    .unwrap();
    let roads = cell_set((0..40).map(|c| Cell::new(0, c)).filter(|c| !grid.is_blocked(c)));
    // More cells than one distance chunk, so the parallel pass spans several chunks.
    let to_reach = cell_set(
        (20..40)
            .flat_map(|r| (0..40).map(move |c| Cell::new(r, c)))
            .filter(|c| !grid.is_blocked(c)),
    );
    for method in [GenerationMethod::ClosestFirst, GenerationMethod::FarthestFirst] {
        let sequential = NetworkConfig::new(3.0, method);
        let parallel = sequential.clone().with_parallel_ordering(true);
        let a = build(&grid, &to_reach, &roads, sequential).unwrap();
        let b = build(&grid, &to_reach, &roads, parallel).unwrap();
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}

#[test]
fn progress_and_messages() {
    let grid = CostGrid::uniform(8, 8, 2.0).unwrap();
    let roads = cell_set([Cell::new(0, 0)]);
    let to_reach = cell_set([Cell::new(7, 7), Cell::new(7, 0)]);
    let builder = NetworkBuilder::new(
        &grid,
        GeoTransform::default(),
        NetworkConfig::new(0.0, GenerationMethod::FarthestFirst),
    )
    .unwrap();
    let mut feedback = CountingFeedback::new(usize::MAX);
    let network = builder.build(&to_reach, &roads, &mut feedback).unwrap();
    assert_eq!(feedback.progress.last(), Some(&100.0));
    assert!(feedback.progress.iter().all(|p| (0.0..=100.0).contains(p)));
    assert!(feedback.infos.iter().any(|m| m.starts_with("Network created")));
    let cost_messages = feedback
        .infos
        .iter()
        .filter(|m| m.starts_with("Cost of road"))
        .count();
    assert_eq!(cost_messages, network.len());
}

#[test]
fn roads_map_to_world_coordinates() {
    // 3 rows of 10 m cells whose top edge lies at y = 1030.
    let geo = GeoTransform::new(500.0, 1030.0, 10.0, 10.0);
    let grid = CostGrid::uniform(3, 3, 1.0).unwrap();
    let roads = cell_set([Cell::new(0, 0)]);
    let to_reach = cell_set([Cell::new(2, 0)]);
    let network = build_road_network(
        &grid,
        geo,
        &to_reach,
        &roads,
        NetworkConfig::new(0.0, GenerationMethod::ClosestFirst),
        &mut LogFeedback,
    )
    .unwrap();
    let polyline = network.segments[0].to_polyline(&geo);
    assert_eq!(polyline.first(), Some(&[505.0, 1005.0]));
    assert_eq!(polyline.last(), Some(&[505.0, 1025.0]));
}

#[test]
fn skidding_distance_is_measured_in_world_units() {
    let grid = CostGrid::uniform(1, 6, 1.0).unwrap();
    let roads = cell_set([Cell::new(0, 0)]);
    let to_reach = cell_set([Cell::new(0, 5)]);
    let config = NetworkConfig::new(40.0, GenerationMethod::ClosestFirst);
    let run = |geo: GeoTransform| {
        NetworkBuilder::new(&grid, geo, config.clone())
            .unwrap()
            .build(&to_reach, &roads, &mut LogFeedback)
            .unwrap()
    };
    // 5 cells of 10 m lie within 40 m only when cells are smaller.
    assert_eq!(run(GeoTransform::new(0.0, 0.0, 10.0, 10.0)).len(), 1);
    assert_eq!(run(GeoTransform::new(0.0, 0.0, 5.0, 5.0)).skipped, 1);
}
