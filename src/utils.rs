pub mod sample_feed;
