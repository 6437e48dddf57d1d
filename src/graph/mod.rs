pub mod debt_graph;
