mod kdtree_trace;
mod polytope_queries;
mod slide_move_walls;
