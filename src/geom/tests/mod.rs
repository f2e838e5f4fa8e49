mod test_periodic_basic;
mod test_polygon_basic;
mod test_spline_basic;
