//! Solidity interfaces of the contracts the rebalancer reads.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IWstETH {
        function stEthPerToken() external view returns (uint256);
    }

    #[sol(rpc)]
    interface IChainlinkFeed {
        function latestAnswer() external view returns (int256);
    }

    #[sol(rpc)]
    interface IRocketTokenRETH {
        function getExchangeRate() external view returns (uint256);
    }

    #[sol(rpc)]
    interface IOsEthPriceFeed {
        function getRate() external view returns (uint256);
    }

    #[sol(rpc)]
    interface ISfrxETH {
        function pricePerShare() external view returns (uint256);
    }

    #[sol(rpc)]
    interface ISwETH {
        function getRate() external view returns (uint256);
    }

    #[sol(rpc)]
    interface IEthxRateProvider {
        function getExchangeRate() external view returns (uint256);
    }

    #[sol(rpc)]
    interface ISetToken {
        function getComponents() external view returns (address[] memory);
        function getDefaultPositionRealUnit(address component) external view returns (int256);
        function positionMultiplier() external view returns (int256);
    }

    #[sol(rpc)]
    interface IBoundedStepwiseLinearPriceAdapter {
        function getEncodedData(
            uint256 initialPrice,
            uint256 slope,
            uint256 bucketSize,
            bool isDecreasing,
            uint256 maxPrice,
            uint256 minPrice
        ) external pure returns (bytes memory);
    }
}
