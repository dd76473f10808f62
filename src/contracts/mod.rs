//! Contract ABI definitions for the fixed external contracts
//!
//! Selectors and struct layouts must match the deployed contracts exactly.

use alloy::sol;

sol! {
    /// Safe v1.4.1 interface (execution, owner manager, module manager)
    interface ISafe {
        function execTransaction(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation,
            uint256 safeTxGas,
            uint256 baseGas,
            uint256 gasPrice,
            address gasToken,
            address payable refundReceiver,
            bytes memory signatures
        ) external payable returns (bool success);

        function execTransactionFromModule(
            address to,
            uint256 value,
            bytes memory data,
            uint8 operation
        ) external returns (bool success);

        function nonce() external view returns (uint256 nonce);
        function getThreshold() external view returns (uint256 threshold);
        function getOwners() external view returns (address[] memory owners);
        function isOwner(address owner) external view returns (bool isOwner);

        function addOwnerWithThreshold(address owner, uint256 _threshold) external;
        function removeOwner(address prevOwner, address owner, uint256 _threshold) external;
        function changeThreshold(uint256 _threshold) external;

        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
        function isModuleEnabled(address module) external view returns (bool enabled);
        function getModulesPaginated(address start, uint256 pageSize)
            external
            view
            returns (address[] memory array, address next);

        event ExecutionSuccess(bytes32 indexed txHash, uint256 payment);
        event ExecutionFailure(bytes32 indexed txHash, uint256 payment);
    }

    /// MultiSend interface for batching multiple calls
    interface IMultiSend {
        /// @param transactions Packed encoding of transactions:
        ///        operation (1 byte) | to (20 bytes) | value (32 bytes) | data length (32 bytes) | data
        function multiSend(bytes memory transactions) external payable;
    }

    /// Zodiac Delay modifier: a timelock between a module and its avatar
    interface IDelay {
        function setUp(bytes memory initParams) external;

        function avatar() external view returns (address);
        function target() external view returns (address);
        function owner() external view returns (address);

        function txCooldown() external view returns (uint256);
        function txExpiration() external view returns (uint256);
        function txNonce() external view returns (uint256);
        function queueNonce() external view returns (uint256);
        function txHash(uint256 nonce) external view returns (bytes32);
        function txCreatedAt(uint256 nonce) external view returns (uint256);
        function getTransactionHash(address to, uint256 value, bytes memory data, uint8 operation)
            external
            pure
            returns (bytes32);

        function setTxCooldown(uint256 cooldown) external;

        function execTransactionFromModule(
            address to,
            uint256 value,
            bytes calldata data,
            uint8 operation
        ) external returns (bool success);

        function executeNextTx(address to, uint256 value, bytes calldata data, uint8 operation) external;

        function enableModule(address module) external;
        function disableModule(address prevModule, address module) external;
        function getModulesPaginated(address start, uint256 pageSize)
            external
            view
            returns (address[] memory array, address next);

        event TransactionAdded(
            uint256 indexed queueNonce,
            bytes32 indexed txHash,
            address to,
            uint256 value,
            bytes data,
            uint8 operation
        );
    }

    /// Zodiac minimal-proxy factory
    interface IModuleProxyFactory {
        function deployModule(address masterCopy, bytes memory initializer, uint256 saltNonce)
            external
            returns (address proxy);

        event ModuleProxyCreation(address indexed proxy, address indexed masterCopy);
    }

    /// Owner-forwarding proxy wallet
    interface IRecoverableWallet {
        function execute(address to, uint256 value, bytes calldata data) external payable returns (bytes memory);
        function deploy(uint256 value, bytes calldata data, bytes32 salt) external payable returns (address);
        function owner() external view returns (address);
    }

    /// ERC20 interface for common token operations
    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 value);
        event Approval(address indexed owner, address indexed spender, uint256 value);
    }

    /// Wrapped ether
    interface IWETH9 {
        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }

    /// Uniswap v3 SwapRouter02
    interface ISwapRouter02 {
        struct ExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint24 fee;
            address recipient;
            uint256 amountIn;
            uint256 amountOutMinimum;
            uint160 sqrtPriceLimitX96;
        }

        function exactInputSingle(ExactInputSingleParams calldata params)
            external
            payable
            returns (uint256 amountOut);
    }

    /// Uniswap v3 QuoterV2
    interface IQuoterV2 {
        struct QuoteExactInputSingleParams {
            address tokenIn;
            address tokenOut;
            uint256 amountIn;
            uint24 fee;
            uint160 sqrtPriceLimitX96;
        }

        function quoteExactInputSingle(QuoteExactInputSingleParams memory params)
            external
            returns (
                uint256 amountOut,
                uint160 sqrtPriceX96After,
                uint32 initializedTicksCrossed,
                uint256 gasEstimate
            );
    }

    /// Yearn v3 (ERC-4626) vault
    interface IYearnVault {
        function asset() external view returns (address);
        function totalAssets() external view returns (uint256);
        function pricePerShare() external view returns (uint256);
        function convertToAssets(uint256 shares) external view returns (uint256);
        function maxWithdraw(address owner) external view returns (uint256);
        function deposit(uint256 assets, address receiver) external returns (uint256 shares);
        function withdraw(uint256 assets, address receiver, address owner) external returns (uint256 shares);
        function redeem(uint256 shares, address receiver, address owner) external returns (uint256 assets);
    }
}
