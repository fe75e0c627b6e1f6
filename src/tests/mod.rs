//! Tests for the streaming Merkle sum tree

mod reader;
