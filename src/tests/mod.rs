mod test_builder;
mod test_data;
mod test_distance;
