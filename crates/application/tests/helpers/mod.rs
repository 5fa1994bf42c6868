pub mod mock_resolvers;
